//! Observer registration and fan-out.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use astralis_protocol::LogEvent;

/// Callback invoked synchronously for every emitted event.
pub type ObserverFn = Arc<dyn Fn(&LogEvent) + Send + Sync + 'static>;

struct Registered {
    id: u64,
    callback: ObserverFn,
}

#[derive(Default)]
struct ListState {
    next_id: u64,
    observers: Vec<Registered>,
}

/// Ordered list of observers.
///
/// Observers are notified in registration order. The list is snapshotted
/// before notification, so callbacks may subscribe, unsubscribe or emit
/// without deadlocking.
#[derive(Default)]
pub struct ObserverList {
    inner: Arc<Mutex<ListState>>,
}

impl ObserverList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns the guard that keeps it registered.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.observers.push(Registered {
            id,
            callback: Arc::new(callback),
        });
        tracing::debug!(id, observers = state.observers.len(), "observer subscribed");

        Subscription {
            id,
            list: Arc::downgrade(&self.inner),
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().observers.is_empty()
    }

    /// Notifies every observer registered at call time.
    ///
    /// A panicking observer is logged and skipped; the remaining observers
    /// are still notified. Returns the number of observers that panicked.
    pub fn notify(&self, event: &LogEvent) -> usize {
        let snapshot: Vec<(u64, ObserverFn)> = self
            .lock()
            .observers
            .iter()
            .map(|o| (o.id, Arc::clone(&o.callback)))
            .collect();

        let mut failed = 0;
        for (id, callback) in snapshot {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
                failed += 1;
                tracing::warn!(
                    id,
                    category = %event.category,
                    panic = panic_message(payload.as_ref()),
                    "log observer panicked"
                );
            }
        }
        failed
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps an observer registered until dropped or cancelled.
///
/// Holds only a weak reference to the list: outliving the facility is fine.
#[must_use = "dropping a Subscription unsubscribes the observer immediately"]
pub struct Subscription {
    id: u64,
    list: Weak<Mutex<ListState>>,
}

impl Subscription {
    /// Unsubscribes now. Equivalent to dropping the guard.
    pub fn cancel(self) {}

    /// Whether the observer is still registered.
    pub fn is_active(&self) -> bool {
        let Some(list) = self.list.upgrade() else {
            return false;
        };
        list.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observers
            .iter()
            .any(|o| o.id == self.id)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(list) = self.list.upgrade() else {
            return;
        };
        let mut state = list.lock().unwrap_or_else(PoisonError::into_inner);
        state.observers.retain(|o| o.id != self.id);
        tracing::debug!(id = self.id, observers = state.observers.len(), "observer unsubscribed");
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
