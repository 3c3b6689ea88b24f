use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// One parsed JSON log line.
///
/// Keys are held in a [`BTreeMap`] so every walk over the record is in
/// ascending key order, which keeps the produced entries byte-stable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: BTreeMap<String, Value>,
}

impl LogRecord {
    /// Parse a single line as a JSON object.
    ///
    /// **Returns**
    /// - `Ok(record)` when the line holds exactly one JSON object (trailing
    ///   whitespace, including the line terminator, is accepted).
    /// - `Err(..)` for anything else.
    ///
    /// Decoding is lossy: invalid UTF-8 bytes and unpaired `\uD800`-`\uDFFF`
    /// escapes become U+FFFD instead of failing the line.
    pub fn parse(line: &[u8]) -> Result<Self, serde_json::Error> {
        let text = String::from_utf8_lossy(line);
        let text = replace_lone_surrogates(&text);
        serde_json::from_str(&text)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up `key` and return it only if it holds a JSON string.
    ///
    /// Any other value type is treated the same as a missing key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The raw `ts` value, or JSON `null` when the record has none.
    pub fn timestamp(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get("ts").unwrap_or(&NULL)
    }

    /// Iterate fields in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Rewrite `\uXXXX` escapes naming a surrogate that is not part of a
/// high/low pair to `\ufffd`. Everything else is copied as is.
fn replace_lone_surrogates(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = escaped_unit(bytes, i) else {
            // Any other escape: skip the escaped byte too, so `\\u` is
            // never read as the start of a unicode escape.
            i += 2;
            continue;
        };
        match unit {
            0xD800..=0xDBFF => {
                if matches!(escaped_unit(bytes, i + 6), Some(0xDC00..=0xDFFF)) {
                    i += 12;
                    continue;
                }
            }
            0xDC00..=0xDFFF => {}
            _ => {
                i += 6;
                continue;
            }
        }
        out.push_str(&text[copied..i]);
        out.push_str("\\ufffd");
        i += 6;
        copied = i;
    }

    if copied == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// The code unit of a `\uXXXX` escape starting at `at`, if there is one.
fn escaped_unit(bytes: &[u8], at: usize) -> Option<u16> {
    let escape = bytes.get(at..at + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    u16::from_str_radix(hex, 16).ok()
}

/// Cloud Logging severity vocabulary used by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `serviceContext` block of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceContext<'a> {
    pub service: &'a str,
}

/// Structured source location derived from a `file:line` caller string.
///
/// Empty parts are left out of the serialized object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub file: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub line: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub function: &'a str,
}

impl<'a> SourceLocation<'a> {
    /// Placeholder used for `function`; callers only carry file and line.
    pub const UNKNOWN_FUNCTION: &'static str = "unknown";

    /// Split a caller string on its first colon.
    ///
    /// Returns `None` when there is no colon at all.
    pub fn from_caller(caller: &'a str) -> Option<Self> {
        let (file, line) = caller.split_once(':')?;
        Some(Self {
            file,
            line,
            function: Self::UNKNOWN_FUNCTION,
        })
    }
}
