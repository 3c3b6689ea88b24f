use crate::convention::Convention;
use crate::record::{LogRecord, ServiceContext, Severity, SourceLocation};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Key Cloud Logging reads the structured source location from.
pub const SOURCE_LOCATION_KEY: &str = "logging.googleapis.com/sourceLocation";

/// Service name written into `serviceContext` unless configured otherwise.
pub const DEFAULT_SERVICE: &str = "fluxcd";

/// A log entry laid out for Cloud Logging's structured JSON ingestion.
///
/// Serialization order is fixed: `severity`, `timestamp`, `message`,
/// `serviceContext`, then the dynamic fields in ascending key order, then
/// the optional source location.
#[derive(Debug, Serialize)]
pub struct StackdriverEntry<'a> {
    pub severity: Severity,
    pub timestamp: &'a Value,
    pub message: Cow<'a, str>,
    #[serde(rename = "serviceContext")]
    pub service_context: ServiceContext<'a>,
    #[serde(flatten)]
    pub fields: BTreeMap<&'a str, &'a Value>,
    #[serde(
        rename = "logging.googleapis.com/sourceLocation",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_location: Option<SourceLocation<'a>>,
}

impl<'a> StackdriverEntry<'a> {
    /// Map a parsed record onto the entry layout.
    ///
    /// **Parameters**
    /// - `record`: the parsed input line.
    /// - `convention`: decides message priority and which keys are dropped
    ///   from the dynamic fields.
    /// - `service`: value for `serviceContext.service`.
    pub fn from_record(record: &'a LogRecord, convention: Convention, service: &'a str) -> Self {
        let (severity, message) = match infer_message(record, convention) {
            Some((severity, message)) => (severity, Cow::Borrowed(message)),
            None => (Severity::Debug, Cow::Owned(query_format(record))),
        };

        let fields = record
            .iter()
            .filter(|(key, _)| !convention.excludes_from_tail(key))
            .collect();

        Self {
            severity,
            timestamp: record.timestamp(),
            message,
            service_context: ServiceContext { service },
            fields,
            source_location: record.get_str("caller").and_then(SourceLocation::from_caller),
        }
    }
}

/// First message key of the convention holding a string value.
fn infer_message(record: &LogRecord, convention: Convention) -> Option<(Severity, &str)> {
    convention
        .message_keys()
        .iter()
        .find_map(|(key, severity)| record.get_str(key).map(|message| (*severity, message)))
}

/// Render the string fields of a record as `key="value"` pairs.
///
/// Used as the message of entries without a recognised message key. Keys
/// come out sorted; `ts`, `caller` and non-string values are skipped.
pub fn query_format(record: &LogRecord) -> String {
    let mut out = String::new();
    for (key, value) in record.iter() {
        if key == "ts" || key == "caller" {
            continue;
        }
        let Value::String(value) = value else {
            continue;
        };
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(key);
        out.push('=');
        quote_into(&mut out, value);
    }
    out
}

/// Double-quote `value` the way Go's `strconv.Quote` does: non-printable
/// runes are written as `\a`-style, `\xHH`, `\uXXXX` or `\UXXXXXXXX` escapes.
fn quote_into(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if is_printable(c) => out.push(c),
            c if (c as u32) < 0x10000 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }
    out.push('"');
}

/// Format (Cf) code points outside the ASCII range.
const FORMAT_CHARS: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
];

/// Printable in the sense of Go's `unicode.IsPrint` for the categories that
/// show up in log text: controls, non-ASCII spaces and separators, format
/// characters, private use and noncharacters are not printable.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    let cp = c as u32;
    if FORMAT_CHARS.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp)) {
        return false;
    }
    let private_use = (0xE000..=0xF8FF).contains(&cp) || cp >= 0xF0000;
    let noncharacter = (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE;
    !(private_use || noncharacter)
}
