use crate::sink::LineSink;
use std::io;

/// A sink that simply drops all lines.
///
/// Useful for measuring the cost of conversion itself without any output
/// I/O. It still counts what passes through.
#[derive(Clone, Debug, Default)]
pub struct NoopSink {
    pub lines: u64,
    pub bytes: u64,
}

impl LineSink for NoopSink {
    fn send(&mut self, line: &[u8]) -> io::Result<()> {
        self.lines += 1;
        self.bytes += line.len() as u64;
        Ok(())
    }
}
