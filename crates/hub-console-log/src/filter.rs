//! Compound entry filtering: severity, category and free-text search.

use std::collections::BTreeMap;

use astralis_protocol::constants::SEVERITY_ALL;
use astralis_protocol::{Counts, LogEntry, Severity};

/// Console filter settings.
///
/// Categories without an explicit entry in `categories` are enabled, so
/// entries from a category the console has never been told about stay
/// visible until the user disables it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    severity_mask: u32,
    categories: BTreeMap<String, bool>,
    search: String,
    search_lower: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            severity_mask: SEVERITY_ALL,
            categories: BTreeMap::new(),
            search: String::new(),
            search_lower: String::new(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Severity ---

    pub fn severity_mask(&self) -> u32 {
        self.severity_mask
    }

    pub fn is_severity_enabled(&self, severity: Severity) -> bool {
        self.severity_mask & severity.bit() != 0
    }

    pub fn set_severity_enabled(&mut self, severity: Severity, enabled: bool) {
        if enabled {
            self.severity_mask |= severity.bit();
        } else {
            self.severity_mask &= !severity.bit();
        }
    }

    // --- Categories ---

    /// Whether `category` passes; absent categories are enabled.
    pub fn is_category_enabled(&self, category: &str) -> bool {
        self.categories.get(category).copied().unwrap_or(true)
    }

    pub fn set_category_enabled(&mut self, category: &str, enabled: bool) {
        self.categories.insert(category.to_owned(), enabled);
    }

    /// Whether `category` has an explicit entry.
    pub fn has_category_entry(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Set every category with an explicit entry to `enabled`.
    pub fn set_all_categories_enabled(&mut self, enabled: bool) {
        for value in self.categories.values_mut() {
            *value = enabled;
        }
    }

    /// Categories with an explicit entry, sorted, with their state.
    pub fn categories(&self) -> impl Iterator<Item = (&str, bool)> {
        self.categories.iter().map(|(name, on)| (name.as_str(), *on))
    }

    // --- Search ---

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search = text.to_owned();
        self.search_lower = text.to_lowercase();
    }

    /// Case-insensitive substring test against the entry message.
    pub fn matches_search(&self, entry: &LogEntry) -> bool {
        self.search_lower.is_empty() || entry.message.to_lowercase().contains(&self.search_lower)
    }

    // --- Predicates ---

    /// Full visibility predicate: severity, category and search.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.is_severity_enabled(entry.severity)
            && self.is_category_enabled(&entry.category)
            && self.matches_search(entry)
    }
}

/// Entries of `buffer` that pass `filter`, in buffer order.
pub fn apply<'a>(buffer: &'a [LogEntry], filter: &FilterState) -> Vec<&'a LogEntry> {
    buffer.iter().filter(|entry| filter.matches(entry)).collect()
}

/// Per-severity counts of entries whose category is enabled.
///
/// Counts ignore both the severity toggles and the search text, so each
/// toolbar button can show how many entries it would reveal.
pub fn count(buffer: &[LogEntry], filter: &FilterState) -> Counts {
    let mut counts = Counts::default();
    for entry in buffer {
        if filter.is_category_enabled(&entry.category) {
            counts.record(entry.severity);
        }
    }
    counts
}
