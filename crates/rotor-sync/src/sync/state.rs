//! Refresh state tracking.

use std::time::{Duration, Instant};

use rotor_core::{StoreSnapshot, Version};

/// What a scheduler knows about its store.
///
/// The loaded version and entry count live in a single
/// [`StoreSnapshot`], so they can only be replaced together. Alongside
/// it the state tracks refresh bookkeeping used for status reporting.
#[derive(Debug, Default)]
pub struct RefreshState {
    /// The last successfully loaded snapshot.
    snapshot: Option<StoreSnapshot>,
    /// When the last successful attempt finished.
    last_success: Option<Instant>,
    /// The last error message, cleared on success.
    last_error: Option<String>,
    /// Number of consecutive failed attempts.
    failure_count: u32,
    /// Number of successful attempts, including no-op ones.
    success_count: u64,
}

impl RefreshState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the loaded snapshot.
    pub fn snapshot(&self) -> Option<StoreSnapshot> {
        self.snapshot
    }

    /// Returns the loaded version, or [`Version::UNLOADED`].
    pub fn version(&self) -> Version {
        self.snapshot
            .map(|s| s.version)
            .unwrap_or(Version::UNLOADED)
    }

    /// Returns the loaded entry count, or -1 when nothing is loaded.
    pub fn entry_count(&self) -> i64 {
        self.snapshot
            .map(|s| s.entry_count as i64)
            .unwrap_or(-1)
    }

    /// Returns true if content at `remote` should be loaded.
    pub fn needs_load(&self, remote: Version) -> bool {
        remote.is_newer_than(self.version())
    }

    /// Replaces the snapshot.
    ///
    /// Snapshots that are not newer than the current one are ignored, so
    /// the loaded version never moves backwards. Returns true if applied.
    pub fn apply(&mut self, snapshot: StoreSnapshot) -> bool {
        if !self.needs_load(snapshot.version) {
            return false;
        }
        self.snapshot = Some(snapshot);
        true
    }

    /// Records a successful attempt.
    pub fn record_success(&mut self) {
        self.last_success = Some(Instant::now());
        self.last_error = None;
        self.failure_count = 0;
        self.success_count += 1;
    }

    /// Records a failed attempt.
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.failure_count += 1;
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Returns the number of successful attempts.
    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    /// Returns the time since the last successful attempt.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.last_success.map(|t| t.elapsed())
    }

    /// Returns true once content has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = RefreshState::new();
        assert!(state.snapshot().is_none());
        assert_eq!(state.version(), Version::UNLOADED);
        assert_eq!(state.entry_count(), -1);
        assert!(!state.is_loaded());
        assert!(state.time_since_success().is_none());
    }

    #[test]
    fn test_apply_newer() {
        let mut state = RefreshState::new();
        assert!(state.apply(StoreSnapshot::new(Version::new(5), 200)));

        assert_eq!(state.version(), Version::new(5));
        assert_eq!(state.entry_count(), 200);
        assert!(state.is_loaded());
    }

    #[test]
    fn test_apply_never_moves_backwards() {
        let mut state = RefreshState::new();
        state.apply(StoreSnapshot::new(Version::new(5), 200));

        assert!(!state.apply(StoreSnapshot::new(Version::new(4), 10)));
        assert!(!state.apply(StoreSnapshot::new(Version::new(5), 10)));

        assert_eq!(state.snapshot(), Some(StoreSnapshot::new(Version::new(5), 200)));
    }

    #[test]
    fn test_needs_load() {
        let mut state = RefreshState::new();
        assert!(state.needs_load(Version::new(0)));

        state.apply(StoreSnapshot::new(Version::new(3), 1));
        assert!(!state.needs_load(Version::new(3)));
        assert!(!state.needs_load(Version::new(2)));
        assert!(state.needs_load(Version::new(4)));
    }

    #[test]
    fn test_record_failure() {
        let mut state = RefreshState::new();
        state.record_failure("network error");
        state.record_failure("timeout");

        assert_eq!(state.failure_count(), 2);
        assert_eq!(state.last_error(), Some("timeout"));
    }

    #[test]
    fn test_success_resets_failure() {
        let mut state = RefreshState::new();
        state.record_failure("error 1");
        state.record_failure("error 2");

        state.record_success();

        assert_eq!(state.failure_count(), 0);
        assert!(state.last_error().is_none());
        assert_eq!(state.success_count(), 1);
        assert!(state.time_since_success().is_some());
    }

    #[test]
    fn test_failure_keeps_snapshot() {
        let mut state = RefreshState::new();
        state.apply(StoreSnapshot::new(Version::new(5), 200));
        state.record_success();

        state.record_failure("corrupt file");

        assert_eq!(state.version(), Version::new(5));
        assert_eq!(state.entry_count(), 200);
    }
}
