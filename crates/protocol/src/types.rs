use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{SEVERITY_ERROR, SEVERITY_INFO, SEVERITY_WARNING};

/// How serious a log message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// The bitmask bit for this severity.
    pub fn bit(self) -> u32 {
        match self {
            Severity::Info => SEVERITY_INFO,
            Severity::Warning => SEVERITY_WARNING,
            Severity::Error => SEVERITY_ERROR,
        }
    }

    /// Lower-case label used in text output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Parses a host level name (`"log"`, `"warn"`, `"exception"`, ...).
    pub fn from_level(level: &str) -> Option<Self> {
        match crate::constants::severity_bit(level) {
            SEVERITY_INFO => Some(Severity::Info),
            SEVERITY_WARNING => Some(Severity::Warning),
            SEVERITY_ERROR => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color with three normalized channels (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Neutral color returned for unknown categories.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Upper-case `RRGGBB` hex without the leading `#`.
    ///
    /// Channels are clamped to 0.0..=1.0 before scaling.
    pub fn to_hex(&self) -> String {
        format!(
            "{:02X}{:02X}{:02X}",
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b)
        )
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

fn channel_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
