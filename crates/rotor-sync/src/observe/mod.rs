//! Observability sinks for refresh outcomes.
//!
//! A scheduler reports to exactly one [`RefreshObserver`] handed to it at
//! construction. [`MetricsObserver`] forwards to the `metrics` facade for
//! export; [`InMemoryObserver`] keeps counters and the most recent
//! outcomes in memory for tests and diagnostics.

mod memory;
mod metrics;

use std::sync::Arc;

use rotor_core::Version;

use crate::sync::RefreshOutcome;

pub use self::memory::{InMemoryObserver, RETAINED_ATTEMPTS, StoreRecord};
pub use self::metrics::{MetricsObserver, register_store_metrics};

/// Receives refresh outcomes and store gauges.
pub trait RefreshObserver: Send + Sync {
    /// Called once per refresh attempt, successful or not.
    fn record_attempt(&self, store: &str, outcome: &RefreshOutcome);

    /// Called with the current version and entry count at construction
    /// and after every load. Both are -1 before the first load.
    fn record_state(&self, store: &str, version: Version, entry_count: i64);
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RefreshObserver for NoopObserver {
    fn record_attempt(&self, _store: &str, _outcome: &RefreshOutcome) {}

    fn record_state(&self, _store: &str, _version: Version, _entry_count: i64) {}
}

impl<T: RefreshObserver + ?Sized> RefreshObserver for Arc<T> {
    fn record_attempt(&self, store: &str, outcome: &RefreshOutcome) {
        (**self).record_attempt(store, outcome);
    }

    fn record_state(&self, store: &str, version: Version, entry_count: i64) {
        (**self).record_state(store, version, entry_count);
    }
}
