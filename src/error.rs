use std::io;

/// Failure that aborts a conversion stream.
///
/// Both kinds are terminal: once one is returned no further input is read.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    /// A line starting with `{` could not be parsed as a JSON object.
    #[error("malformed JSON log line {line}: {source}")]
    MalformedLine {
        /// 1-based input line number.
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("stream I/O error: {0}")]
    Io(#[from] io::Error),
}
