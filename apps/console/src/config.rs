//! Replay tool configuration.
//!
//! Configuration is stored as TOML. Every field is optional; a missing file
//! yields the defaults.

use std::path::{Path, PathBuf};

use astralis_console_log::FacilityConfig;
use astralis_hub_console_log::FilterState;
use astralis_protocol::{Rgb, Severity};
use serde::{Deserialize, Serialize};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "astralis-console.toml";

/// Where decorated baseline lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Tracing,
    Stderr,
    None,
}

/// Format of the visible-entry report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// An extra category registered before replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub color: [f32; 3],
}

/// Initial console filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_severities")]
    pub severities: Vec<Severity>,

    #[serde(default)]
    pub disabled_categories: Vec<String>,

    #[serde(default)]
    pub search: String,

    /// Stop replaying at the first error entry.
    #[serde(default)]
    pub error_pause: bool,
}

fn default_severities() -> Vec<Severity> {
    Severity::ALL.to_vec()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            severities: default_severities(),
            disabled_categories: Vec::new(),
            search: String::new(),
            error_pause: false,
        }
    }
}

impl FilterConfig {
    /// Apply these settings on top of `base`.
    pub fn apply_to(&self, mut base: FilterState) -> FilterState {
        for severity in Severity::ALL {
            base.set_severity_enabled(severity, self.severities.contains(&severity));
        }
        for category in &self.disabled_categories {
            base.set_category_enabled(category, false);
        }
        base.set_search_text(&self.search);
        base
    }
}

/// Replay tool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default = "default_true")]
    pub capture_stacks: bool,

    /// Caller frames to drop from captured stacks.
    #[serde(default)]
    pub stack_skip: usize,

    #[serde(default)]
    pub sink: SinkKind,

    #[serde(default)]
    pub output: OutputFormat,

    #[serde(default)]
    pub categories: Vec<CategoryConfig>,

    #[serde(default)]
    pub filter: FilterConfig,
}

fn default_log_filter() -> String {
    "info,astralis=debug".into()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            capture_stacks: default_true(),
            stack_skip: 0,
            sink: SinkKind::default(),
            output: OutputFormat::default(),
            categories: Vec::new(),
            filter: FilterConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when
    /// no path is given. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    pub fn facility_config(&self) -> FacilityConfig {
        FacilityConfig {
            capture_stacks: self.capture_stacks,
            stack_skip: self.stack_skip,
        }
    }

    /// Extra categories as `(name, color)` pairs.
    pub fn extra_categories(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.categories
            .iter()
            .map(|c| (c.name.as_str(), Rgb::from(c.color)))
    }
}
