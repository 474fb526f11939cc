//! Attach/detach scope between a console and a facility.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use astralis_console_log::{LogFacility, Subscription};

use crate::state::ConsoleLogHub;

/// A console subscribed to a [`LogFacility`].
///
/// Attaching subscribes the console; [`detach`](Self::detach) or dropping
/// the session unsubscribes it, so a session never leaks a subscription.
pub struct ConsoleSession {
    hub: Arc<Mutex<ConsoleLogHub>>,
    subscription: Option<Subscription>,
}

impl ConsoleSession {
    /// Attach a fresh console to `facility`.
    pub fn attach(facility: &LogFacility) -> Self {
        Self::attach_hub(facility, ConsoleLogHub::new())
    }

    /// Attach an already configured console to `facility`.
    pub fn attach_hub(facility: &LogFacility, hub: ConsoleLogHub) -> Self {
        let hub = Arc::new(Mutex::new(hub));
        let sink = Arc::clone(&hub);
        let subscription = facility.subscribe(move |event| {
            let (changes, on_change) = {
                let mut hub = lock(&sink);
                let (_, changes) = hub.append(event);
                (changes, hub.change_handler())
            };
            // Announce outside the lock so the callback may log again.
            if let Some(on_change) = on_change {
                for change in changes {
                    on_change(change);
                }
            }
        });
        tracing::info!("console attached");

        Self {
            hub,
            subscription: Some(subscription),
        }
    }

    /// Stop receiving entries. Buffered entries stay readable.
    ///
    /// Idempotent.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::info!("console detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Lock the console state.
    ///
    /// Do not emit through the facility while holding the guard: the
    /// session's observer needs the same lock.
    pub fn hub(&self) -> MutexGuard<'_, ConsoleLogHub> {
        lock(&self.hub)
    }

    /// Shared handle to the console state.
    pub fn shared(&self) -> Arc<Mutex<ConsoleLogHub>> {
        Arc::clone(&self.hub)
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        self.detach();
    }
}

fn lock(hub: &Mutex<ConsoleLogHub>) -> MutexGuard<'_, ConsoleLogHub> {
    hub.lock().unwrap_or_else(PoisonError::into_inner)
}
