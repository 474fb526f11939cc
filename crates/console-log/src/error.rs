//! Error types for log sinks.

/// Errors a baseline sink may report. The facility never surfaces these to
/// the emitting call site.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}
