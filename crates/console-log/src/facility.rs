//! The emission API.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use astralis_protocol::constants::GENERAL_CATEGORY;
use astralis_protocol::{LogEvent, Rgb, Severity};
use chrono::Local;

use crate::observers::{ObserverList, Subscription};
use crate::registry::CategoryRegistry;
use crate::sink::{LogSink, TracingSink};
use crate::stack;

/// Emission behaviour toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityConfig {
    /// Capture a call stack for every emission.
    pub capture_stacks: bool,
    /// Caller frames to drop after the facility's own frames (for logging
    /// helpers that wrap the facility).
    pub stack_skip: usize,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            capture_stacks: true,
            stack_skip: 0,
        }
    }
}

/// Categorized logging service.
///
/// Construct one per process and share it by reference or `Arc`. Every
/// emission writes a decorated line to the baseline sink and then notifies
/// all subscribed observers before returning. Emission never fails.
pub struct LogFacility {
    registry: RwLock<CategoryRegistry>,
    observers: ObserverList,
    sink: Box<dyn LogSink>,
    config: FacilityConfig,
}

impl LogFacility {
    /// A facility with the default categories, tracing output and stack capture.
    pub fn new() -> Self {
        Self::with_registry(CategoryRegistry::with_defaults())
    }

    /// A facility over an explicit registry.
    pub fn with_registry(registry: CategoryRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            observers: ObserverList::new(),
            sink: Box::new(TracingSink),
            config: FacilityConfig::default(),
        }
    }

    /// Replace the baseline sink.
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_config(mut self, config: FacilityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> FacilityConfig {
        self.config
    }

    // --- Categories ---

    /// Register a category color. The first registration of a name wins.
    pub fn register_category(&self, name: &str, color: Rgb) -> bool {
        let inserted = self.registry_mut().register(name, color);
        if inserted {
            tracing::debug!(category = name, color = %color.to_hex(), "category registered");
        }
        inserted
    }

    /// Color of `name`, or white for unknown categories.
    pub fn color_of(&self, name: &str) -> Rgb {
        self.registry().color_of(name)
    }

    /// All registered category names, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        self.registry().all_categories()
    }

    // --- Observers ---

    /// Subscribe to every subsequent emission.
    ///
    /// The observer stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // --- Emission ---

    /// Emit `message` under `category` with the given severity.
    pub fn emit(&self, category: &str, message: impl Display, severity: Severity) {
        let message = message.to_string();

        let line = self.registry().decorate(category, &message);
        match panic::catch_unwind(AssertUnwindSafe(|| self.sink.write(severity, &line))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, category, "baseline sink write failed"),
            Err(_) => tracing::debug!(category, "baseline sink panicked"),
        }

        let stack = if self.config.capture_stacks {
            stack::capture(self.config.stack_skip)
        } else {
            String::new()
        };

        let event = LogEvent {
            category: category.to_owned(),
            message,
            severity,
            stack,
            timestamp: Local::now(),
        };
        self.observers.notify(&event);
    }

    pub fn log(&self, category: &str, message: impl Display) {
        self.emit(category, message, Severity::Info);
    }

    pub fn warn(&self, category: &str, message: impl Display) {
        self.emit(category, message, Severity::Warning);
    }

    pub fn error(&self, category: &str, message: impl Display) {
        self.emit(category, message, Severity::Error);
    }

    /// [`log`](Self::log) under the `General` category.
    pub fn log_general(&self, message: impl Display) {
        self.log(GENERAL_CATEGORY, message);
    }

    /// [`warn`](Self::warn) under the `General` category.
    pub fn warn_general(&self, message: impl Display) {
        self.warn(GENERAL_CATEGORY, message);
    }

    /// [`error`](Self::error) under the `General` category.
    pub fn error_general(&self, message: impl Display) {
        self.error(GENERAL_CATEGORY, message);
    }

    fn registry(&self) -> RwLockReadGuard<'_, CategoryRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, CategoryRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogFacility {
    fn default() -> Self {
        Self::new()
    }
}
