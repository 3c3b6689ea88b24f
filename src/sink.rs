use std::io::{self, Write};

/// Destination for converted lines.
///
/// Implementations receive every output chunk in input order, exactly as
/// produced by the converter (passthrough lines keep their own terminator,
/// entries end in CRLF).
pub trait LineSink {
    /// Write a single converted line.
    ///
    /// **Returns**
    /// - `Ok(())` once the whole chunk has been accepted.
    /// - `Err(..)` if the underlying writer failed; the stream is aborted.
    fn send(&mut self, line: &[u8]) -> io::Result<()>;

    /// Flush anything the sink holds back.
    ///
    /// Default implementation is a no-op.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// [`LineSink`] over any [`Write`] implementation (stdout, stderr, a file,
/// a `Vec<u8>`).
#[derive(Debug, Default)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn send(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn send(&mut self, line: &[u8]) -> io::Result<()> {
        (**self).send(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Standard stream the converted output is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    Stderr,
}

impl Destination {
    pub fn from_stderr_flag(stderr: bool) -> Self {
        if stderr {
            Destination::Stderr
        } else {
            Destination::Stdout
        }
    }

    /// Open a locked writer on the selected stream.
    pub fn writer(&self) -> Box<dyn Write> {
        match self {
            Destination::Stdout => Box::new(io::stdout().lock()),
            Destination::Stderr => Box::new(io::stderr().lock()),
        }
    }
}
