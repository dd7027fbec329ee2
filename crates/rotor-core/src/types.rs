//! Common type definitions and newtypes for Rotor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision token of a store's remote content.
///
/// Versions are totally ordered and strictly increase over the lifetime
/// of a source. In practice they are integers (often a timestamp written
/// by the publisher of the content).
///
/// # Example
///
/// ```
/// use rotor_core::Version;
///
/// let v = Version::new(5);
/// assert!(v > Version::UNLOADED);
/// assert_eq!(v.get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Sentinel lower than any version a source will publish.
    pub const UNLOADED: Version = Version(-1);

    /// Creates a new Version.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true if this version is newer than `other`.
    pub fn is_newer_than(self, other: Version) -> bool {
        self > other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Version and entry count of a successfully loaded store.
///
/// The two fields always move together: a snapshot is only ever
/// replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Version the content was loaded from.
    pub version: Version,
    /// Number of entries the load produced.
    pub entry_count: u64,
}

impl StoreSnapshot {
    /// Creates a new snapshot.
    pub fn new(version: Version, entry_count: u64) -> Self {
        Self {
            version,
            entry_count,
        }
    }
}

/// Lifecycle of a refresh scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Constructed, not started yet.
    Created,
    /// Retrying the initial load.
    Starting,
    /// Initial load succeeded; background refresh is ticking.
    Running,
    /// Shut down explicitly.
    Stopped,
}

impl Lifecycle {
    /// Returns true once the initial load has succeeded and the
    /// scheduler has not been stopped.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Health of a single component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether the component is healthy.
    pub healthy: bool,
    /// Why the component is unhealthy, if it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthStatus {
    /// A healthy status.
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            reason: None,
        }
    }

    /// An unhealthy status with a reason.
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            healthy: false,
            reason: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(0) > Version::UNLOADED);
        assert!(Version::new(2).is_newer_than(Version::new(1)));
        assert!(!Version::new(1).is_newer_than(Version::new(1)));
        assert!(!Version::new(4).is_newer_than(Version::new(5)));
    }

    #[test]
    fn test_version_serializes_transparently() {
        let json = serde_json::to_string(&Version::new(1700000000)).unwrap();
        assert_eq!(json, "1700000000");

        let v: Version = serde_json::from_str("42").unwrap();
        assert_eq!(v, Version::new(42));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = StoreSnapshot::new(Version::new(5), 200);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"version":5,"entryCount":200}"#);
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(Lifecycle::Starting.to_string(), "starting");
        assert!(Lifecycle::Running.is_running());
        assert!(!Lifecycle::Stopped.is_running());
    }

    #[test]
    fn test_health_status() {
        assert!(HealthStatus::healthy().healthy);

        let status = HealthStatus::unhealthy("not started");
        assert!(!status.healthy);
        assert_eq!(status.reason.as_deref(), Some("not started"));

        let json = serde_json::to_string(&HealthStatus::healthy()).unwrap();
        assert_eq!(json, r#"{"healthy":true}"#);
    }
}
