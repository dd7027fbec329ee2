//! In-memory observer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rotor_core::Version;

use super::RefreshObserver;
use crate::sync::RefreshOutcome;

/// Attempts kept per store; older ones are dropped.
pub const RETAINED_ATTEMPTS: usize = 256;

/// Everything recorded for one store.
#[derive(Debug, Clone)]
pub struct StoreRecord {
    /// The last [`RETAINED_ATTEMPTS`] attempts, oldest first.
    pub attempts: Vec<RefreshOutcome>,
    /// Successful attempts (the refreshed counter).
    pub successes: u64,
    /// Failed attempts.
    pub failures: u64,
    /// Summed attempt time.
    pub total_time: Duration,
    /// Last reported version gauge.
    pub version: Version,
    /// Last reported entry count gauge.
    pub entry_count: i64,
}

impl Default for StoreRecord {
    fn default() -> Self {
        Self {
            attempts: Vec::new(),
            successes: 0,
            failures: 0,
            total_time: Duration::ZERO,
            version: Version::UNLOADED,
            entry_count: -1,
        }
    }
}

/// Observer that keeps every outcome and gauge in memory.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObserver {
    records: Arc<RwLock<HashMap<String, StoreRecord>>>,
}

impl InMemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the record for `store`.
    pub fn record(&self, store: &str) -> Option<StoreRecord> {
        self.records.read().get(store).cloned()
    }

    /// Returns all attempts for `store`.
    pub fn attempts(&self, store: &str) -> Vec<RefreshOutcome> {
        self.record(store).map(|r| r.attempts).unwrap_or_default()
    }

    /// Returns the number of successful attempts for `store`.
    pub fn successes(&self, store: &str) -> u64 {
        self.record(store).map(|r| r.successes).unwrap_or(0)
    }

    /// Returns the number of failed attempts for `store`.
    pub fn failures(&self, store: &str) -> u64 {
        self.record(store).map(|r| r.failures).unwrap_or(0)
    }

    /// Returns the last version gauge for `store`.
    pub fn version(&self, store: &str) -> Option<Version> {
        self.record(store).map(|r| r.version)
    }

    /// Returns the last entry count gauge for `store`.
    pub fn entry_count(&self, store: &str) -> Option<i64> {
        self.record(store).map(|r| r.entry_count)
    }
}

impl RefreshObserver for InMemoryObserver {
    fn record_attempt(&self, store: &str, outcome: &RefreshOutcome) {
        let mut records = self.records.write();
        let record = records.entry(store.to_string()).or_default();

        record.total_time += outcome.elapsed();
        if outcome.is_success() {
            record.successes += 1;
        } else {
            record.failures += 1;
        }
        if record.attempts.len() == RETAINED_ATTEMPTS {
            record.attempts.remove(0);
        }
        record.attempts.push(outcome.clone());
    }

    fn record_state(&self, store: &str, version: Version, entry_count: i64) {
        let mut records = self.records.write();
        let record = records.entry(store.to_string()).or_default();

        record.version = version;
        record.entry_count = entry_count;
    }
}
