pub mod console_log;
pub mod constants;
pub mod types;

// Re-export primary types for convenience.
pub use console_log::{Counts, LogEntry, LogEvent};
pub use types::{Rgb, Severity};
