//! Line splitting and the copy loop.
//!
//! Input is read one `\n`-terminated line at a time, pushed through the
//! [`Converter`] and handed on before the next line is read.

use crate::convert::Converter;
use crate::error::ConvertError;
use crate::sink::LineSink;
use std::borrow::Cow;
use std::io::BufRead;
use tracing::{debug, trace};

/// One chunk of output, tagged with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// The input line, byte for byte.
    Passthrough(Vec<u8>),
    /// A rewritten JSON entry ending in CRLF.
    Entry(Vec<u8>),
}

impl OutputLine {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OutputLine::Passthrough(b) | OutputLine::Entry(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            OutputLine::Passthrough(b) | OutputLine::Entry(b) => b,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, OutputLine::Entry(_))
    }
}

/// Lazy iterator of converted lines over a buffered reader.
///
/// Yields one item per input line. The first error ends the iteration:
/// every later call to `next` returns `None`.
pub struct ConvertedLines<R> {
    reader: R,
    converter: Converter,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl<R: BufRead> ConvertedLines<R> {
    pub fn new(reader: R, converter: Converter) -> Self {
        Self {
            reader,
            converter,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of input lines read so far.
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> Iterator for ConvertedLines<R> {
    type Item = Result<OutputLine, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => self.line += 1,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        }

        let line = self.line;
        match self.converter.convert_line(&self.buf) {
            Ok(Cow::Borrowed(raw)) => Some(Ok(OutputLine::Passthrough(raw.to_vec()))),
            Ok(Cow::Owned(entry)) => {
                trace!(line, "converted JSON log line");
                Some(Ok(OutputLine::Entry(entry)))
            }
            Err(source) => {
                self.done = true;
                Some(Err(ConvertError::MalformedLine { line, source }))
            }
        }
    }
}

/// Counters collected by [`copy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub lines: u64,
    pub converted: u64,
    pub passed_through: u64,
    pub bytes_written: u64,
}

/// Convert everything from `reader` into `sink`, in order.
///
/// Stops at the first failure; lines already sent stay sent. The sink is
/// flushed once input is exhausted.
pub fn copy<R, S>(reader: R, converter: Converter, mut sink: S) -> Result<CopyStats, ConvertError>
where
    R: BufRead,
    S: LineSink,
{
    let mut stats = CopyStats::default();

    for output in ConvertedLines::new(reader, converter) {
        let output = output?;
        sink.send(output.as_bytes())?;

        stats.lines += 1;
        stats.bytes_written += output.as_bytes().len() as u64;
        if output.is_entry() {
            stats.converted += 1;
        } else {
            stats.passed_through += 1;
        }
    }

    sink.flush()?;
    debug!(
        lines = stats.lines,
        converted = stats.converted,
        passed_through = stats.passed_through,
        bytes = stats.bytes_written,
        "input exhausted"
    );
    Ok(stats)
}
