use std::sync::Arc;

use astralis_protocol::constants::CONSOLE_CATEGORIES;
use astralis_protocol::{Counts, LogEntry, LogEvent, Severity};

use crate::filter::{self, FilterState};

/// Notification sent to the presentation layer after the console changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleChange {
    /// A new entry was buffered; views should repaint and scroll to it.
    EntryAppended { id: u64 },
    /// Filter settings changed; the visible set must be recomputed.
    FilterChanged,
    /// The buffer was emptied.
    Cleared,
    /// An error arrived while error pause is on.
    ErrorPaused { id: u64 },
}

/// Callback invoked with every console change.
pub type OnChangeFn = Box<dyn Fn(ConsoleChange) + Send + Sync + 'static>;

type SharedOnChange = Arc<dyn Fn(ConsoleChange) + Send + Sync + 'static>;

/// Console log state: entry buffer, filters and live counts.
///
/// The buffer is append-only and unbounded; only [`clear`](Self::clear)
/// shrinks it. The host feeds events in through [`on_entry`](Self::on_entry)
/// (normally via a [`ConsoleSession`](crate::ConsoleSession)) and the UI
/// reads from it. All methods are synchronous.
pub struct ConsoleLogHub {
    entries: Vec<LogEntry>,
    filter: FilterState,
    counts: Counts,
    known_categories: Vec<String>,
    next_id: u64,
    error_pause: bool,
    on_change: Option<SharedOnChange>,
}

impl ConsoleLogHub {
    /// Create a console offering the built-in category list in its filter menu.
    pub fn new() -> Self {
        Self::with_categories(CONSOLE_CATEGORIES.iter().copied())
    }

    /// Create a console with a custom category list. Each listed category
    /// starts enabled.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known: Vec<String> = categories.into_iter().map(Into::into).collect();
        known.sort();
        known.dedup();

        let mut filter = FilterState::default();
        for category in &known {
            filter.set_category_enabled(category, true);
        }

        Self {
            entries: Vec::new(),
            filter,
            counts: Counts::default(),
            known_categories: known,
            next_id: 0,
            error_pause: false,
            on_change: None,
        }
    }

    /// Install the change callback, replacing any previous one.
    ///
    /// Entries delivered through a [`ConsoleSession`](crate::ConsoleSession)
    /// are announced after the session releases the hub, so the callback may
    /// log through the facility. Filter and clear changes are announced
    /// while the caller holds the hub.
    pub fn set_on_change(&mut self, on_change: OnChangeFn) {
        self.on_change = Some(Arc::from(on_change));
    }

    pub(crate) fn change_handler(&self) -> Option<SharedOnChange> {
        self.on_change.clone()
    }

    // --- Ingest ---

    /// Buffer an observed event and update counts. Returns the entry id.
    pub fn on_entry(&mut self, event: &LogEvent) -> u64 {
        let (id, changes) = self.append(event);
        for change in changes {
            self.notify(change);
        }
        id
    }

    /// Buffer an event without announcing it. Returns the entry id and the
    /// changes the caller must deliver.
    pub(crate) fn append(&mut self, event: &LogEvent) -> (u64, Vec<ConsoleChange>) {
        let id = self.next_id;
        self.next_id += 1;

        let entry = LogEntry::from_event(id, event);
        if self.filter.is_category_enabled(&entry.category) {
            self.counts.record(entry.severity);
        }
        let is_error = entry.severity == Severity::Error;
        self.entries.push(entry);

        let mut changes = vec![ConsoleChange::EntryAppended { id }];
        if is_error && self.error_pause {
            tracing::debug!(id, "error pause triggered");
            changes.push(ConsoleChange::ErrorPaused { id });
        }
        (id, changes)
    }

    /// Empty the buffer and zero the counts. Filters are kept.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.counts = Counts::default();
        tracing::debug!(dropped, "console cleared");
        self.notify(ConsoleChange::Cleared);
    }

    // --- Queries ---

    /// All buffered entries (oldest first).
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries passing the current filters, oldest first.
    pub fn visible_entries(&self) -> Vec<&LogEntry> {
        filter::apply(&self.entries, &self.filter)
    }

    /// Per-severity counts over entries in enabled categories.
    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Categories offered by the filter menu, sorted.
    pub fn known_categories(&self) -> &[String] {
        &self.known_categories
    }

    pub fn error_pause(&self) -> bool {
        self.error_pause
    }

    // --- Filter mutation ---

    pub fn set_severity_enabled(&mut self, severity: Severity, enabled: bool) {
        self.filter.set_severity_enabled(severity, enabled);
        self.filters_changed(true);
    }

    pub fn toggle_severity(&mut self, severity: Severity) {
        let enabled = self.filter.is_severity_enabled(severity);
        self.set_severity_enabled(severity, !enabled);
    }

    pub fn set_category_enabled(&mut self, category: &str, enabled: bool) {
        self.filter.set_category_enabled(category, enabled);
        self.filters_changed(true);
    }

    pub fn toggle_category(&mut self, category: &str) {
        let enabled = self.filter.is_category_enabled(category);
        self.set_category_enabled(category, !enabled);
    }

    /// Enable or disable every category the filter menu knows about,
    /// including ones toggled individually. Unseen categories keep their
    /// default (enabled).
    pub fn set_all_categories_enabled(&mut self, enabled: bool) {
        self.filter.set_all_categories_enabled(enabled);
        self.filters_changed(true);
    }

    /// Set the free-text search. Counts are unaffected.
    pub fn set_search_text(&mut self, text: &str) {
        self.filter.set_search_text(text);
        self.filters_changed(false);
    }

    /// Replace the whole filter state at once.
    ///
    /// Known categories missing from `filter` are added as enabled, so
    /// [`set_all_categories_enabled`](Self::set_all_categories_enabled)
    /// keeps covering the whole menu list.
    pub fn set_filter(&mut self, mut filter: FilterState) {
        for category in &self.known_categories {
            if !filter.has_category_entry(category) {
                filter.set_category_enabled(category, true);
            }
        }
        self.filter = filter;
        self.filters_changed(true);
    }

    pub fn set_error_pause(&mut self, enabled: bool) {
        self.error_pause = enabled;
    }

    fn filters_changed(&mut self, recount: bool) {
        if recount {
            self.counts = filter::count(&self.entries, &self.filter);
        }
        self.notify(ConsoleChange::FilterChanged);
    }

    fn notify(&self, change: ConsoleChange) {
        if let Some(on_change) = &self.on_change {
            on_change(change);
        }
    }
}

impl Default for ConsoleLogHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConsoleLogHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogHub")
            .field("entries", &self.entries.len())
            .field("filter", &self.filter)
            .field("counts", &self.counts)
            .field("error_pause", &self.error_pause)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Local;

    use super::*;

    fn make_event(severity: Severity, category: &str, message: &str) -> LogEvent {
        LogEvent {
            category: category.into(),
            message: message.into(),
            severity,
            stack: String::new(),
            timestamp: Local::now(),
        }
    }

    fn recording(hub: &mut ConsoleLogHub) -> Arc<Mutex<Vec<ConsoleChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        hub.set_on_change(Box::new(move |c| sink.lock().unwrap().push(c)));
        changes
    }

    #[test]
    fn on_entry_fills_buffer_in_order() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Info, "Player", "hello"));
        hub.on_entry(&make_event(Severity::Warning, "Enemy", "careful"));
        hub.on_entry(&make_event(Severity::Error, "Save", "boom"));

        assert_eq!(hub.len(), 3);
        let texts: Vec<&str> = hub.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(texts, vec!["hello", "careful", "boom"]);
        let ids: Vec<u64> = hub.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn one_of_each_severity_counts() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Info, "General", "a"));
        hub.on_entry(&make_event(Severity::Warning, "General", "b"));
        hub.on_entry(&make_event(Severity::Error, "General", "c"));

        assert_eq!(
            hub.counts(),
            Counts {
                info: 1,
                warning: 1,
                error: 1
            }
        );
    }

    #[test]
    fn entries_in_disabled_category_not_counted_on_arrival() {
        let mut hub = ConsoleLogHub::new();
        hub.set_category_enabled("AI", false);

        hub.on_entry(&make_event(Severity::Warning, "AI", "stuck"));
        hub.on_entry(&make_event(Severity::Warning, "UI", "slow"));

        assert_eq!(hub.counts().warning, 1);
        assert_eq!(hub.len(), 2);

        hub.set_category_enabled("AI", true);
        assert_eq!(hub.counts().warning, 2);
    }

    #[test]
    fn counts_match_full_recount_after_mixed_operations() {
        let mut hub = ConsoleLogHub::new();
        let severities = [Severity::Info, Severity::Warning, Severity::Error];
        let categories = ["Physics", "Player", "Custom"];

        for i in 0..30 {
            hub.on_entry(&make_event(severities[i % 3], categories[i % 4 % 3], "x"));
            if i == 10 {
                hub.set_category_enabled("Player", false);
            }
            if i == 20 {
                hub.toggle_severity(Severity::Info);
                hub.set_category_enabled("Custom", false);
            }
        }

        assert_eq!(hub.counts(), filter::count(hub.entries(), hub.filter()));
    }

    #[test]
    fn clear_resets_buffer_and_counts_but_keeps_filters() {
        let mut hub = ConsoleLogHub::new();
        hub.set_search_text("needle");
        hub.set_category_enabled("Audio", false);
        hub.on_entry(&make_event(Severity::Error, "UI", "a"));

        hub.clear();
        assert!(hub.is_empty());
        assert_eq!(hub.counts(), Counts::default());

        hub.clear();
        assert!(hub.is_empty());
        assert_eq!(hub.counts(), Counts::default());

        assert_eq!(hub.filter().search_text(), "needle");
        assert!(!hub.filter().is_category_enabled("Audio"));
    }

    #[test]
    fn ids_keep_increasing_after_clear() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Info, "UI", "a"));
        hub.clear();
        let id = hub.on_entry(&make_event(Severity::Info, "UI", "b"));
        assert_eq!(id, 1);
    }

    #[test]
    fn search_does_not_change_counts() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Info, "Input", "jump pressed"));
        hub.on_entry(&make_event(Severity::Warning, "Input", "axis drift"));
        let before = hub.counts();

        hub.set_search_text("xyz");

        assert!(hub.visible_entries().is_empty());
        assert_eq!(hub.counts(), before);
    }

    #[test]
    fn known_categories_start_enabled() {
        let hub = ConsoleLogHub::new();
        assert_eq!(hub.known_categories().len(), CONSOLE_CATEGORIES.len());
        for category in CONSOLE_CATEGORIES {
            assert!(hub.filter().is_category_enabled(category));
        }
    }

    #[test]
    fn custom_category_list_is_sorted_and_deduplicated() {
        let hub = ConsoleLogHub::with_categories(["Zeta", "Alpha", "Zeta"]);
        assert_eq!(hub.known_categories(), ["Alpha", "Zeta"]);
    }

    #[test]
    fn disable_all_spares_unlisted_categories() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Info, "Player", "listed"));
        hub.on_entry(&make_event(Severity::Info, "Boss", "unlisted"));

        hub.set_all_categories_enabled(false);

        let visible: Vec<&str> = hub
            .visible_entries()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(visible, vec!["unlisted"]);
        assert_eq!(hub.counts().info, 1);

        hub.set_all_categories_enabled(true);
        assert_eq!(hub.visible_entries().len(), 2);
    }

    #[test]
    fn disable_all_includes_individually_toggled_categories() {
        let mut hub = ConsoleLogHub::new();
        hub.set_category_enabled("Boss", true);
        hub.set_all_categories_enabled(false);

        assert!(!hub.filter().is_category_enabled("Boss"));
    }

    #[test]
    fn toggle_category_flips_effective_state() {
        let mut hub = ConsoleLogHub::new();
        hub.toggle_category("Physics");
        assert!(!hub.filter().is_category_enabled("Physics"));
        hub.toggle_category("Physics");
        assert!(hub.filter().is_category_enabled("Physics"));

        // Unseen categories are enabled, so the first toggle disables them.
        hub.toggle_category("Boss");
        assert!(!hub.filter().is_category_enabled("Boss"));
    }

    #[test]
    fn change_notifications() {
        let mut hub = ConsoleLogHub::new();
        let changes = recording(&mut hub);

        hub.on_entry(&make_event(Severity::Info, "UI", "a"));
        hub.set_search_text("a");
        hub.set_severity_enabled(Severity::Info, false);
        hub.clear();

        assert_eq!(
            *changes.lock().unwrap(),
            vec![
                ConsoleChange::EntryAppended { id: 0 },
                ConsoleChange::FilterChanged,
                ConsoleChange::FilterChanged,
                ConsoleChange::Cleared,
            ]
        );
    }

    #[test]
    fn error_pause_signals_only_errors() {
        let mut hub = ConsoleLogHub::new();
        let changes = recording(&mut hub);
        hub.set_error_pause(true);

        hub.on_entry(&make_event(Severity::Warning, "AI", "hmm"));
        hub.on_entry(&make_event(Severity::Error, "AI", "crash"));

        assert!(hub.error_pause());
        assert_eq!(
            *changes.lock().unwrap(),
            vec![
                ConsoleChange::EntryAppended { id: 0 },
                ConsoleChange::EntryAppended { id: 1 },
                ConsoleChange::ErrorPaused { id: 1 },
            ]
        );
    }

    #[test]
    fn no_error_pause_by_default() {
        let mut hub = ConsoleLogHub::new();
        let changes = recording(&mut hub);

        hub.on_entry(&make_event(Severity::Error, "AI", "crash"));

        assert_eq!(changes.lock().unwrap().len(), 1);
    }

    #[test]
    fn set_filter_recounts() {
        let mut hub = ConsoleLogHub::new();
        hub.on_entry(&make_event(Severity::Error, "Save", "a"));

        let mut filter = FilterState::default();
        filter.set_category_enabled("Save", false);
        hub.set_filter(filter);

        assert_eq!(hub.counts().error, 0);
        assert!(hub.visible_entries().is_empty());
    }

    #[test]
    fn set_filter_keeps_known_categories_listed() {
        let mut hub = ConsoleLogHub::with_categories(["Audio", "Save"]);
        hub.on_entry(&make_event(Severity::Info, "Audio", "beep"));
        hub.on_entry(&make_event(Severity::Info, "Save", "ok"));

        let mut filter = FilterState::default();
        filter.set_category_enabled("Save", false);
        hub.set_filter(filter);

        assert!(hub.filter().has_category_entry("Audio"));
        assert!(!hub.filter().is_category_enabled("Save"));

        hub.set_all_categories_enabled(false);
        assert!(hub.visible_entries().is_empty());

        hub.set_all_categories_enabled(true);
        assert_eq!(hub.visible_entries().len(), 2);
    }

    #[test]
    fn append_defers_notification() {
        let mut hub = ConsoleLogHub::new();
        hub.set_error_pause(true);
        let changes = recording(&mut hub);

        let (id, pending) = hub.append(&make_event(Severity::Error, "Save", "boom"));

        assert_eq!(id, 0);
        assert_eq!(
            pending,
            vec![
                ConsoleChange::EntryAppended { id: 0 },
                ConsoleChange::ErrorPaused { id: 0 },
            ]
        );
        assert!(changes.lock().unwrap().is_empty());
        assert_eq!(hub.counts().error, 1);
    }
}
