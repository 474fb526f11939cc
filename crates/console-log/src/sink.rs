//! Baseline output sinks.
//!
//! Every emission writes its decorated line to exactly one sink before
//! observers are notified. Sink failures are reported back to the facility,
//! which discards them.

use std::io::Write;
use std::sync::Mutex;

use astralis_protocol::Severity;

use crate::error::SinkError;

/// Tracing target used by [`TracingSink`].
pub const SINK_TARGET: &str = "astralis";

/// Destination for decorated log lines.
pub trait LogSink: Send + Sync {
    fn write(&self, severity: Severity, line: &str) -> Result<(), SinkError>;
}

/// Forwards lines to the active `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, severity: Severity, line: &str) -> Result<(), SinkError> {
        match severity {
            Severity::Info => tracing::info!(target: SINK_TARGET, "{line}"),
            Severity::Warning => tracing::warn!(target: SINK_TARGET, "{line}"),
            Severity::Error => tracing::error!(target: SINK_TARGET, "{line}"),
        }
        Ok(())
    }
}

/// Writes one line per emission to any `io::Write`, prefixed with the
/// upper-case severity.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl WriterSink<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write(&self, severity: Severity, line: &str) -> Result<(), SinkError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Unavailable("writer lock poisoned".into()))?;
        let tag = severity.as_str().to_uppercase();
        writeln!(writer, "{tag:<7} {line}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn write(&self, _severity: Severity, _line: &str) -> Result<(), SinkError> {
        Ok(())
    }
}
