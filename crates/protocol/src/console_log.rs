use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_MESSAGE_MAX;
use crate::types::Severity;

/// A single emission as fanned out to observers.
///
/// The message is rendered to text when the event is built, never lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub category: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stack: String,
    pub timestamp: DateTime<Local>,
}

/// A buffered console entry.
///
/// `id` is the insertion sequence number within the owning buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub category: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stack: String,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Builds an entry from an observed event.
    pub fn from_event(id: u64, event: &LogEvent) -> Self {
        Self {
            id,
            category: event.category.clone(),
            message: event.message.clone(),
            severity: event.severity,
            stack: event.stack.clone(),
            timestamp: event.timestamp,
        }
    }

    /// The message shortened for a single display row.
    pub fn display_message(&self) -> String {
        truncate_for_display(&self.message)
    }

    /// Wall-clock time of the entry as `HH:MM:SS`.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Per-severity entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl Counts {
    /// Count for a single severity.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    /// Increments the counter for `severity`.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.warning + self.error
    }
}

/// Shortens `message` to at most [`DISPLAY_MESSAGE_MAX`] characters,
/// replacing the tail with `...` when it is cut.
pub fn truncate_for_display(message: &str) -> String {
    if message.chars().count() <= DISPLAY_MESSAGE_MAX {
        return message.to_owned();
    }
    let mut out: String = message.chars().take(DISPLAY_MESSAGE_MAX - 3).collect();
    out.push_str("...");
    out
}
