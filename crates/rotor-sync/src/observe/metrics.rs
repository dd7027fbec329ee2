//! Store refresh metrics recording.

use metrics::{counter, gauge, histogram};
use rotor_core::Version;

use super::RefreshObserver;
use crate::sync::RefreshOutcome;

/// Registers the store refresh metrics.
/// Call once at startup, after the recorder is installed.
pub fn register_store_metrics() {
    metrics::describe_counter!(
        "rotor_store_refreshed_total",
        "Total number of successful store refreshes"
    );
    metrics::describe_counter!(
        "rotor_store_refresh_failures_total",
        "Total number of failed store refreshes"
    );
    metrics::describe_counter!(
        "rotor_store_refresh_time_ms_total",
        "Total time (ms) spent refreshing stores"
    );
    metrics::describe_histogram!(
        "rotor_store_refresh_duration_seconds",
        "Duration of store refresh attempts"
    );
    metrics::describe_gauge!("rotor_store_version", "Currently loaded store version");
    metrics::describe_gauge!(
        "rotor_store_entry_count",
        "Number of entries in the loaded store"
    );
}

/// Observer that forwards to the `metrics` facade, labelled by store.
///
/// Whatever recorder the process installed (Prometheus in the server)
/// receives the values; with no recorder installed the calls are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver;

impl MetricsObserver {
    pub fn new() -> Self {
        Self
    }
}

impl RefreshObserver for MetricsObserver {
    fn record_attempt(&self, store: &str, outcome: &RefreshOutcome) {
        let store = store.to_string();

        counter!("rotor_store_refresh_time_ms_total", "store" => store.clone())
            .increment(outcome.elapsed_ms());
        histogram!("rotor_store_refresh_duration_seconds", "store" => store.clone())
            .record(outcome.elapsed().as_secs_f64());

        if outcome.is_success() {
            counter!("rotor_store_refreshed_total", "store" => store).increment(1);
        } else {
            counter!("rotor_store_refresh_failures_total", "store" => store).increment(1);
        }
    }

    fn record_state(&self, store: &str, version: Version, entry_count: i64) {
        gauge!("rotor_store_version", "store" => store.to_string()).set(version.get() as f64);
        gauge!("rotor_store_entry_count", "store" => store.to_string()).set(entry_count as f64);
    }
}
