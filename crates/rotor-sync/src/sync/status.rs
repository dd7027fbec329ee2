//! Point-in-time status of a scheduler.

use rotor_core::{HealthStatus, Lifecycle};
use serde::Serialize;

/// Serializable view of one scheduler, for status endpoints and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    /// Store name.
    pub store: String,
    /// Scheduler lifecycle.
    pub lifecycle: Lifecycle,
    /// Loaded version, -1 before the first load.
    pub version: i64,
    /// Loaded entry count, -1 before the first load.
    pub entry_count: i64,
    /// Current health.
    pub health: HealthStatus,
    /// Consecutive failed attempts.
    pub consecutive_failures: u32,
    /// Successful attempts so far.
    pub successful_refreshes: u64,
    /// Milliseconds since the last successful attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success_age_ms: Option<u64>,
    /// Error from the most recent attempt, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
