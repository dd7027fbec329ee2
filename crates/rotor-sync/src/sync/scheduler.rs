//! Refresh scheduler.
//!
//! A scheduler keeps one store current. Starting it runs the initial
//! load, retrying every `refresh_interval` until it succeeds, and then
//! ticks forever at the same interval, loading only when the source
//! reports a newer version. All source calls run on the blocking pool
//! and are serialized per scheduler.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use rotor_core::{
    HealthStatus, Lifecycle, Result, StoreError, StoreSnapshot, Version, VersionedSource,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at};
use tracing::{debug, error, info, trace, warn};

use super::{RefreshOutcome, RefreshState, RefreshStatus, StoreStatus};
use crate::config::RefreshConfig;
use crate::health::{HealthComponent, HealthRegistry};
use crate::observe::{NoopObserver, RefreshObserver};

/// Object-safe form of [`VersionedSource`]: probe, compare, load.
trait Probe: Send + Sync {
    fn probe_and_load(&self, current: Version) -> Result<RefreshStatus>;
}

impl<S: VersionedSource> Probe for S {
    fn probe_and_load(&self, current: Version) -> Result<RefreshStatus> {
        let metadata = self.metadata()?;
        let remote = self.version(&metadata)?;

        if !remote.is_newer_than(current) {
            return Ok(RefreshStatus::Unchanged { current, remote });
        }

        let entry_count = self.load_content(&metadata)?;
        Ok(RefreshStatus::Loaded {
            snapshot: StoreSnapshot::new(remote, entry_count),
        })
    }
}

/// State shared between the scheduler task, its handle, and the
/// blocking workers.
struct Shared {
    config: RefreshConfig,
    source: Box<dyn Probe>,
    /// Held for the whole of an attempt; attempts never overlap.
    flight: Mutex<()>,
    state: RwLock<RefreshState>,
    observer: Arc<dyn RefreshObserver>,
    health: HealthComponent,
    lifecycle: watch::Sender<Lifecycle>,
}

impl Shared {
    fn name(&self) -> &str {
        self.config.store_name()
    }

    /// Runs one attempt on the calling thread. Must not be called from
    /// an async context: sources may block.
    fn refresh_blocking(&self) -> RefreshOutcome {
        let _flight = self.flight.lock();

        let started = Instant::now();
        let current = self.state.read().version();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.source.probe_and_load(current)))
            .unwrap_or_else(|payload| Err(StoreError::Worker(panic_message(&*payload))))
            .and_then(|status| self.require_loadable(status));
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok(status) => RefreshOutcome::new(elapsed, status),
            Err(e) => RefreshOutcome::failed(elapsed, e),
        };

        self.record(&outcome);
        outcome
    }

    /// With nothing loaded, a remote version that is not newer than
    /// the sentinel is a failed fetch.
    fn require_loadable(&self, status: RefreshStatus) -> Result<RefreshStatus> {
        match status {
            RefreshStatus::Unchanged { current, remote } if current == Version::UNLOADED => {
                Err(StoreError::fetch(
                    self.name(),
                    format!("no loadable version published (remote version {})", remote),
                ))
            },
            status => Ok(status),
        }
    }

    /// Applies an outcome to state, health, and the observer.
    fn record(&self, outcome: &RefreshOutcome) {
        {
            let mut state = self.state.write();
            if let Some(snapshot) = outcome.loaded_snapshot() {
                state.apply(snapshot);
            }
            match outcome.error_detail() {
                None => state.record_success(),
                Some(error) => state.record_failure(error),
            }
        }

        if let Some(snapshot) = outcome.loaded_snapshot() {
            info!(
                store = %self.name(),
                version = %snapshot.version,
                entry_count = snapshot.entry_count,
                "Successfully loaded store version"
            );
            self.observer.record_state(
                self.name(),
                snapshot.version,
                snapshot.entry_count as i64,
            );
        }

        match outcome.error_detail() {
            None => self.health.set_healthy(),
            Some(error) => self.health.set_unhealthy(error),
        }

        self.observer.record_attempt(self.name(), outcome);
    }

    /// Runs one attempt on the blocking pool.
    async fn attempt(self: &Arc<Self>) -> RefreshOutcome {
        let shared = Arc::clone(self);
        let started = Instant::now();

        match tokio::task::spawn_blocking(move || shared.refresh_blocking()).await {
            Ok(outcome) => outcome,
            // Panics are caught inside the worker; this is a worker that
            // never ran, e.g. the runtime is shutting down.
            Err(e) => {
                let outcome = RefreshOutcome::failed(
                    started.elapsed(),
                    StoreError::Worker(e.to_string()),
                );
                let _flight = self.flight.lock();
                self.record(&outcome);
                outcome
            },
        }
    }

    fn set_lifecycle(&self, lifecycle: Lifecycle) {
        self.lifecycle.send_replace(lifecycle);
        debug!(store = %self.name(), %lifecycle, "Scheduler lifecycle changed");
    }

    fn status(&self) -> StoreStatus {
        let state = self.state.read();
        StoreStatus {
            store: self.name().to_string(),
            lifecycle: *self.lifecycle.borrow(),
            version: state.version().get(),
            entry_count: state.entry_count(),
            health: self.health.status(),
            consecutive_failures: state.failure_count(),
            successful_refreshes: state.success_count(),
            last_success_age_ms: state.time_since_success().map(|d| d.as_millis() as u64),
            last_error: state.last_error().map(String::from),
        }
    }

    /// Runs the scheduler: initial load with retry, then the periodic loop.
    async fn run(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) {
        let period = self.config.refresh_interval();

        self.set_lifecycle(Lifecycle::Starting);
        self.health.set_unhealthy("still starting");

        loop {
            if *shutdown_rx.borrow() {
                self.set_lifecycle(Lifecycle::Stopped);
                return;
            }

            info!(store = %self.name(), "Starting store loading");
            let outcome = self.attempt().await;
            if outcome.is_success() && self.state.read().is_loaded() {
                break;
            }

            error!(
                store = %self.name(),
                error = outcome.error_detail().unwrap_or_default(),
                retry_in_ms = self.config.refresh_interval_ms(),
                "Failed store loading, trying again"
            );

            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = shutdown_requested(&mut shutdown_rx) => {
                    info!(store = %self.name(), "Refresh scheduler stopped before initial load");
                    self.set_lifecycle(Lifecycle::Stopped);
                    return;
                }
            }
        }

        self.set_lifecycle(Lifecycle::Running);
        info!(
            store = %self.name(),
            interval_ms = self.config.refresh_interval_ms(),
            "Successful store loading, starting background refresh"
        );

        // Fixed period. Ticks missed while an attempt is in flight are
        // skipped, not replayed.
        let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.attempt().await;
                    if outcome.is_success() {
                        trace!(
                            store = %self.name(),
                            elapsed_ms = outcome.elapsed_ms(),
                            "Successfully refreshed store"
                        );
                    } else {
                        error!(
                            store = %self.name(),
                            elapsed_ms = outcome.elapsed_ms(),
                            error = outcome.error_detail().unwrap_or_default(),
                            "Failed to refresh store"
                        );
                    }
                }
                _ = shutdown_requested(&mut shutdown_rx) => {
                    info!(store = %self.name(), "Refresh scheduler shutting down");
                    break;
                }
            }
        }

        self.set_lifecycle(Lifecycle::Stopped);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    format!("source panicked: {}", message)
}

/// Resolves once a stop has been requested or the handle is gone.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Keeps one versioned store loaded and current.
///
/// # Example
///
/// ```ignore
/// use rotor_sync::{HealthRegistry, MetricsObserver, RefreshConfig, RefreshScheduler};
///
/// let config = RefreshConfig::builder()
///     .store_name("keys")
///     .refresh_interval_ms(60_000)
///     .build()?;
///
/// let health = HealthRegistry::new();
/// let scheduler =
///     RefreshScheduler::new(config, source, Arc::new(MetricsObserver::new()), &health)?;
///
/// // Resolves once the first load succeeded.
/// let handle = scheduler.start_and_wait().await?;
/// ```
pub struct RefreshScheduler {
    shared: Arc<Shared>,
}

impl RefreshScheduler {
    /// Creates a new scheduler.
    ///
    /// Registers the health component `"<store>-rotator"` as unhealthy
    /// ("not started") and reports the unloaded gauges.
    ///
    /// # Errors
    ///
    /// `StoreError::Configuration` if `config` is invalid.
    pub fn new<S: VersionedSource>(
        config: RefreshConfig,
        source: S,
        observer: Arc<dyn RefreshObserver>,
        health: &HealthRegistry,
    ) -> Result<Self> {
        config.validate()?;

        let component = health.register(config.health_component_name());
        component.set_unhealthy("not started");
        observer.record_state(config.store_name(), Version::UNLOADED, -1);

        let (lifecycle, _) = watch::channel(Lifecycle::Created);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                source: Box::new(source),
                flight: Mutex::new(()),
                state: RwLock::new(RefreshState::new()),
                observer,
                health: component,
                lifecycle,
            }),
        })
    }

    /// Creates a scheduler with no observer and a private health registry.
    pub fn with_defaults<S: VersionedSource>(config: RefreshConfig, source: S) -> Result<Self> {
        Self::new(
            config,
            source,
            Arc::new(NoopObserver),
            &HealthRegistry::new(),
        )
    }

    /// Returns the store name.
    pub fn store_name(&self) -> &str {
        self.shared.name()
    }

    /// Returns the current lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.borrow()
    }

    /// Returns the current health.
    pub fn health(&self) -> HealthStatus {
        self.shared.health.status()
    }

    /// Returns the loaded snapshot.
    pub fn snapshot(&self) -> Option<StoreSnapshot> {
        self.shared.state.read().snapshot()
    }

    /// Runs a single refresh attempt without starting the scheduler.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.shared.attempt().await
    }

    /// Starts the scheduler on the current tokio runtime.
    ///
    /// Returns immediately; use [`RefreshHandle::started`] to wait for
    /// the initial load.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(self) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(Arc::clone(&self.shared).run(shutdown_rx));

        RefreshHandle {
            shared: self.shared,
            shutdown_tx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Starts the scheduler and waits for the initial load to succeed.
    ///
    /// Transient fetch and load failures never make this fail; it keeps
    /// waiting while the scheduler retries.
    ///
    /// # Errors
    ///
    /// `StoreError::Shutdown` if the scheduler stopped before loading.
    pub async fn start_and_wait(self) -> Result<RefreshHandle> {
        let handle = self.start();
        handle.started().await?;
        Ok(handle)
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("store", &self.store_name())
            .field("lifecycle", &self.lifecycle())
            .finish()
    }
}

/// Handle for controlling a running refresh scheduler.
///
/// Dropping the handle stops the scheduler.
pub struct RefreshHandle {
    shared: Arc<Shared>,
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshHandle {
    /// Returns the store name.
    pub fn store_name(&self) -> &str {
        self.shared.name()
    }

    /// Returns the current lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        *self.shared.lifecycle.borrow()
    }

    /// Returns the current health.
    pub fn health(&self) -> HealthStatus {
        self.shared.health.status()
    }

    /// Returns the loaded snapshot.
    pub fn snapshot(&self) -> Option<StoreSnapshot> {
        self.shared.state.read().snapshot()
    }

    /// Returns a status view of the scheduler.
    pub fn status(&self) -> StoreStatus {
        self.shared.status()
    }

    /// Waits until the initial load has succeeded.
    ///
    /// # Errors
    ///
    /// `StoreError::Shutdown` if the scheduler is stopped.
    pub async fn started(&self) -> Result<()> {
        let mut rx = self.shared.lifecycle.subscribe();
        let lifecycle = *rx
            .wait_for(|l| matches!(l, Lifecycle::Running | Lifecycle::Stopped))
            .await
            .map_err(|_| StoreError::Shutdown)?;

        if lifecycle.is_running() {
            Ok(())
        } else {
            Err(StoreError::Shutdown)
        }
    }

    /// Manually triggers a refresh.
    ///
    /// Waits for any attempt already in flight, then runs one more.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        info!(store = %self.store_name(), "Manual refresh triggered");
        let outcome = self.shared.attempt().await;

        if let Some(error) = outcome.error_detail() {
            warn!(store = %self.store_name(), error, "Manual refresh failed");
        }

        outcome
    }

    /// Signals the scheduler to stop without waiting for it.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Stops the scheduler and waits for it to finish.
    ///
    /// An attempt already in flight runs to completion first.
    pub async fn shutdown(&self) {
        self.stop();

        let task = self.task.lock().take();
        if let Some(task) = task
            && let Err(e) = task.await
        {
            warn!(store = %self.store_name(), "Refresh scheduler task failed: {}", e);
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RefreshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshHandle")
            .field("store", &self.store_name())
            .field("lifecycle", &self.lifecycle())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
