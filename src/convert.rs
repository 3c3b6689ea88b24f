use crate::convention::Convention;
use crate::entry::{StackdriverEntry, DEFAULT_SERVICE};
use crate::record::LogRecord;
use std::borrow::Cow;

/// Rewrites single Flux log lines into Cloud Logging entries.
///
/// Holds no per-line state; the same converter can be reused for any
/// number of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    convention: Convention,
    service: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Convention::default(), DEFAULT_SERVICE)
    }
}

impl Converter {
    pub fn new(convention: Convention, service: impl Into<String>) -> Self {
        Converter {
            convention,
            service: service.into(),
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Convert one input line.
    ///
    /// **Returns**
    /// - `Ok(Cow::Borrowed(line))` when the line is not a JSON object (its
    ///   first non-blank byte is not `{`, or it is blank): the bytes come
    ///   back untouched, terminator included.
    /// - `Ok(Cow::Owned(..))` with a single-line JSON entry terminated by
    ///   CRLF for JSON lines.
    /// - `Err(..)` when a `{`-prefixed line fails to parse.
    pub fn convert_line<'l>(&self, line: &'l [u8]) -> Result<Cow<'l, [u8]>, serde_json::Error> {
        match line.trim_ascii_start().first() {
            Some(b'{') => {}
            _ => return Ok(Cow::Borrowed(line)),
        }

        let record = LogRecord::parse(line)?;
        let entry = StackdriverEntry::from_record(&record, self.convention, &self.service);
        let mut out = serde_json::to_vec(&entry)?;
        out.extend_from_slice(b"\r\n");
        Ok(Cow::Owned(out))
    }
}
