use crate::types::Rgb;

/// Severity bitmask: informational messages.
pub const SEVERITY_INFO: u32 = 1;
/// Severity bitmask: warnings.
pub const SEVERITY_WARNING: u32 = 2;
/// Severity bitmask: errors (host exceptions and assertions included).
pub const SEVERITY_ERROR: u32 = 4;
/// Every severity enabled.
pub const SEVERITY_ALL: u32 = SEVERITY_INFO | SEVERITY_WARNING | SEVERITY_ERROR;

/// Category used by the emission overloads that take no category.
pub const GENERAL_CATEGORY: &str = "General";

/// Categories registered when a registry is seeded with defaults.
pub const DEFAULT_CATEGORIES: &[(&str, Rgb)] = &[
    ("Player", Rgb::new(0.3, 0.7, 1.0)),
    ("Enemy", Rgb::new(1.0, 0.3, 0.3)),
    ("UI", Rgb::new(0.9, 0.9, 0.3)),
    ("Audio", Rgb::new(0.7, 0.3, 1.0)),
    ("Input", Rgb::new(0.3, 1.0, 0.5)),
    ("GameManager", Rgb::new(1.0, 0.6, 0.2)),
    ("AI", Rgb::new(1.0, 0.4, 0.7)),
    ("Physics", Rgb::new(0.5, 0.8, 0.9)),
    ("Animation", Rgb::new(0.8, 0.5, 0.3)),
    ("Save", Rgb::new(0.4, 0.9, 0.4)),
    (GENERAL_CATEGORY, Rgb::new(0.8, 0.8, 0.8)),
];

/// Categories the console offers in its filter menu.
///
/// Must stay in sync with [`DEFAULT_CATEGORIES`]: a category missing here can
/// be logged but not toggled from the menu.
pub const CONSOLE_CATEGORIES: &[&str] = &[
    "AI",
    "Animation",
    "Audio",
    "Enemy",
    "GameManager",
    GENERAL_CATEGORY,
    "Input",
    "Physics",
    "Player",
    "Save",
    "UI",
];

/// Messages longer than this are shortened for display.
pub const DISPLAY_MESSAGE_MAX: usize = 500;

/// Maps a host level name to its severity bit. Returns 0 for unknown levels.
pub fn severity_bit(level: &str) -> u32 {
    match level {
        "log" | "info" => SEVERITY_INFO,
        "warn" | "warning" => SEVERITY_WARNING,
        "error" | "exception" | "assert" => SEVERITY_ERROR,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bit_mapping() {
        assert_eq!(severity_bit("log"), 1);
        assert_eq!(severity_bit("info"), 1);
        assert_eq!(severity_bit("warn"), 2);
        assert_eq!(severity_bit("warning"), 2);
        assert_eq!(severity_bit("error"), 4);
        assert_eq!(severity_bit("exception"), 4);
        assert_eq!(severity_bit("assert"), 4);
        assert_eq!(severity_bit("verbose"), 0);
    }

    #[test]
    fn severity_all() {
        assert_eq!(SEVERITY_ALL, 7);
    }

    #[test]
    fn console_list_matches_default_seed() {
        let mut seeded: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|(name, _)| *name).collect();
        seeded.sort_unstable();
        assert_eq!(seeded, CONSOLE_CATEGORIES);
    }

    #[test]
    fn default_colors_are_distinct() {
        for (i, (_, a)) in DEFAULT_CATEGORIES.iter().enumerate() {
            for (_, b) in &DEFAULT_CATEGORIES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
