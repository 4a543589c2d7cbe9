//! # Output Sink
//!
//! Records are written to standard output, one line per record, and flushed
//! before the logging call returns so a crash never loses the last line.
//!
//! The formatting layer hands each rendered record to the writer in a single
//! `write_all` call. [`FlushingWriter`] turns that into `write_all` + `flush`
//! on the real stream and never reports failure upward: any I/O error is
//! rendered on the error channel as
//! `Exception from the logging library: <error>` and then dropped.
//!
//! [`StdoutSink`] holds the stdout lock for the whole record, so concurrent
//! writers never interleave within a line.

use crate::error::LoggingError;
use std::fmt::Display;
use std::io::{self, Stderr, StdoutLock, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Prefix of every diagnostic line on the error channel
pub const INTERNAL_ERROR_PREFIX: &str = "Exception from the logging library: ";

/// Render the diagnostic line for an internal logging failure.
pub fn internal_error_line(error: &dyn Display) -> String {
    format!("{INTERNAL_ERROR_PREFIX}{error}")
}

/// Report an internal failure on `errors` without failing the caller.
pub fn report_internal_error_to<E: Write>(errors: &mut E, error: &dyn Display) {
    // Nowhere left to report a failing error channel.
    let _ = writeln!(errors, "{}", internal_error_line(error));
}

/// Report an internal failure on standard error.
pub fn report_internal_error(error: &dyn Display) {
    report_internal_error_to(&mut io::stderr(), error);
}

/// Writer that flushes after every write and swallows I/O errors
#[derive(Debug)]
pub struct FlushingWriter<W: Write, E: Write = Stderr> {
    inner: W,
    errors: E,
}

impl<W: Write> FlushingWriter<W> {
    /// Wrap `inner`, reporting failures on standard error.
    pub fn new(inner: W) -> Self {
        Self::with_error_channel(inner, io::stderr())
    }
}

impl<W: Write, E: Write> FlushingWriter<W, E> {
    /// Wrap `inner`, reporting failures on `errors`.
    pub fn with_error_channel(inner: W, errors: E) -> Self {
        Self { inner, errors }
    }

    /// Unwrap into the output and error streams.
    pub fn into_parts(self) -> (W, E) {
        (self.inner, self.errors)
    }
}

impl<W: Write, E: Write> Write for FlushingWriter<W, E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write_all(buf).and_then(|()| self.inner.flush());
        if let Err(err) = result {
            report_internal_error_to(&mut self.errors, &LoggingError::Io(err));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Err(err) = self.inner.flush() {
            report_internal_error_to(&mut self.errors, &LoggingError::Io(err));
        }
        Ok(())
    }
}

/// Standard output with flush-per-record
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl<'a> MakeWriter<'a> for StdoutSink {
    type Writer = FlushingWriter<StdoutLock<'static>>;

    fn make_writer(&'a self) -> Self::Writer {
        FlushingWriter::new(io::stdout().lock())
    }
}
