//! Categorized logging facility.
//!
//! Every message carries a category with a stable display color. Emission
//! writes a color-decorated line to a baseline sink (tracing by default) and
//! synchronously fans a [`LogEvent`](astralis_protocol::LogEvent) out to all
//! subscribed observers, each with the caller's stack attached.
//!
//! The facility is an owned service object: build one at startup and pass it
//! by reference or `Arc`. Subscriptions are guards; dropping one unsubscribes.

pub mod error;
pub mod facility;
pub mod observers;
pub mod registry;
pub mod sink;
pub mod stack;

pub use error::SinkError;
pub use facility::{FacilityConfig, LogFacility};
pub use observers::{ObserverFn, ObserverList, Subscription};
pub use registry::CategoryRegistry;
pub use sink::{LogSink, NullSink, TracingSink, WriterSink};
