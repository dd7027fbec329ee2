//! Test helpers for scheduler tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::Instant;
use rotor_sync::rotor_core::{HealthStatus, Result, StoreError, Version, VersionedSource};
use rotor_sync::{HealthRegistry, InMemoryObserver, RefreshObserver, RefreshOutcome};

/// Source driven by scripts of metadata and load results.
///
/// Each metadata call pops the next scripted version; once the script
/// runs out the last successful version repeats. Loads work the same
/// way, defaulting to `Ok(100)`.
pub struct ScriptedSource {
    versions: Mutex<VecDeque<std::result::Result<i64, String>>>,
    last_version: Mutex<i64>,
    exhausted_error: Option<String>,
    loads: Mutex<VecDeque<std::result::Result<u64, String>>>,
    load_delay: Duration,
    fetch_time: Duration,
    metadata_starts: Mutex<Vec<Instant>>,
    metadata_calls: AtomicUsize,
    load_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(versions: Vec<std::result::Result<i64, String>>) -> Self {
        Self {
            versions: Mutex::new(versions.into()),
            last_version: Mutex::new(0),
            exhausted_error: None,
            loads: Mutex::new(VecDeque::new()),
            load_delay: Duration::ZERO,
            fetch_time: Duration::ZERO,
            metadata_starts: Mutex::new(Vec::new()),
            metadata_calls: AtomicUsize::new(0),
            load_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Source whose every call returns `version`.
    pub fn constant(version: i64) -> Self {
        Self::new(vec![Ok(version)])
    }

    /// Source whose metadata fetch always fails.
    pub fn unreachable(reason: &str) -> Self {
        let mut source = Self::new(Vec::new());
        source.exhausted_error = Some(reason.to_string());
        source
    }

    pub fn with_loads(self, loads: Vec<std::result::Result<u64, String>>) -> Self {
        *self.loads.lock() = loads.into();
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Makes every metadata call advance the paused clock by `time`.
    ///
    /// Only usable on a runtime with a paused clock.
    pub fn with_fetch_time(mut self, time: Duration) -> Self {
        self.fetch_time = time;
        self
    }

    /// Clock readings taken as each metadata call began.
    pub fn metadata_starts(&self) -> Vec<Instant> {
        self.metadata_starts.lock().clone()
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl VersionedSource for ScriptedSource {
    type Metadata = i64;

    fn metadata(&self) -> Result<i64> {
        self.metadata_starts.lock().push(Instant::now());
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);

        if !self.fetch_time.is_zero() {
            Handle::current().block_on(tokio::time::advance(self.fetch_time));
        }

        match self.versions.lock().pop_front() {
            Some(Ok(v)) => {
                *self.last_version.lock() = v;
                Ok(v)
            },
            Some(Err(reason)) => Err(StoreError::fetch("scripted", reason)),
            None => match &self.exhausted_error {
                Some(reason) => Err(StoreError::fetch("scripted", reason.clone())),
                None => Ok(*self.last_version.lock()),
            },
        }
    }

    fn version(&self, metadata: &i64) -> Result<Version> {
        Ok(Version::new(*metadata))
    }

    fn load_content(&self, _metadata: &i64) -> Result<u64> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.load_calls.fetch_add(1, Ordering::SeqCst);

        if !self.load_delay.is_zero() {
            std::thread::sleep(self.load_delay);
        }

        let result = match self.loads.lock().pop_front() {
            Some(Ok(count)) => Ok(count),
            Some(Err(reason)) => Err(StoreError::load("scripted", reason)),
            None => Ok(100),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Observer that records the store's health right after every attempt.
pub struct HealthTrackingObserver {
    registry: HealthRegistry,
    component: String,
    pub inner: InMemoryObserver,
    pub health: Mutex<Vec<HealthStatus>>,
}

impl HealthTrackingObserver {
    pub fn new(registry: HealthRegistry, store: &str) -> Self {
        Self {
            registry,
            component: format!("{}-rotator", store),
            inner: InMemoryObserver::new(),
            health: Mutex::new(Vec::new()),
        }
    }

    pub fn transitions(&self) -> Vec<bool> {
        self.health.lock().iter().map(|h| h.healthy).collect()
    }
}

impl RefreshObserver for HealthTrackingObserver {
    fn record_attempt(&self, store: &str, outcome: &RefreshOutcome) {
        if let Some(component) = self.registry.get(&self.component) {
            self.health.lock().push(component.status());
        }
        self.inner.record_attempt(store, outcome);
    }

    fn record_state(&self, store: &str, version: Version, entry_count: i64) {
        self.inner.record_state(store, version, entry_count);
    }
}

/// Polls until `store` has at least `n` recorded attempts.
pub async fn wait_for_attempts(observer: &InMemoryObserver, store: &str, n: usize) {
    for _ in 0..10_000 {
        if observer.attempts(store).len() >= n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!(
        "store {} reached only {} attempts, expected {}",
        store,
        observer.attempts(store).len(),
        n
    );
}
