//! Result of a single refresh attempt.

use std::time::Duration;

use rotor_core::{StoreSnapshot, Version};
use serde::Serialize;

/// What a refresh attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RefreshStatus {
    /// A newer version was found and loaded.
    Loaded {
        /// The snapshot now in effect.
        snapshot: StoreSnapshot,
    },
    /// The remote version was not newer than the loaded one.
    Unchanged {
        /// Version currently loaded.
        current: Version,
        /// Version the source reported.
        remote: Version,
    },
    /// The attempt failed; nothing changed.
    Failed {
        /// Error message.
        error: String,
    },
}

/// Outcome of one refresh attempt, handed to observers and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    #[serde(serialize_with = "serialize_millis", rename = "elapsedMs")]
    elapsed: Duration,
    #[serde(flatten)]
    status: RefreshStatus,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl RefreshOutcome {
    /// Creates a new outcome.
    pub fn new(elapsed: Duration, status: RefreshStatus) -> Self {
        Self { elapsed, status }
    }

    /// Creates a failed outcome.
    pub fn failed(elapsed: Duration, error: impl ToString) -> Self {
        Self::new(
            elapsed,
            RefreshStatus::Failed {
                error: error.to_string(),
            },
        )
    }

    /// Returns true unless the attempt failed.
    pub fn is_success(&self) -> bool {
        !matches!(self.status, RefreshStatus::Failed { .. })
    }

    /// Returns true if the attempt loaded new content.
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, RefreshStatus::Loaded { .. })
    }

    /// Returns the wall-clock duration of the attempt.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the duration of the attempt in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Returns the error message of a failed attempt.
    pub fn error_detail(&self) -> Option<&str> {
        match &self.status {
            RefreshStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Returns the snapshot loaded by this attempt, if any.
    pub fn loaded_snapshot(&self) -> Option<StoreSnapshot> {
        match self.status {
            RefreshStatus::Loaded { snapshot } => Some(snapshot),
            _ => None,
        }
    }

    /// Returns what the attempt did.
    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }
}
