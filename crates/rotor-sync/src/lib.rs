//! # Rotor Sync
//!
//! Keeps in-process copies of externally stored, versioned content loaded
//! and current.
//!
//! A [`RefreshScheduler`] owns one store. Starting it performs the
//! initial load, retrying at a fixed interval until it succeeds, and then
//! polls the [`VersionedSource`] on the same interval, loading new
//! content only when the source reports a newer version. Failures never
//! stop the scheduler: the last good content stays loaded and the
//! store's health component reports the error.
//!
//! ## Features
//!
//! - Blocking source calls run on tokio's blocking pool
//! - Attempts for one store are serialized
//! - Pluggable observers ([`MetricsObserver`], [`InMemoryObserver`])
//! - Injected [`HealthRegistry`], one component per store
//! - Explicit shutdown that waits for the in-flight attempt
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rotor_sync::{HealthRegistry, MetricsObserver, RefreshConfig, RefreshScheduler};
//!
//! let health = HealthRegistry::new();
//! let config = RefreshConfig::builder()
//!     .store_name("keys")
//!     .refresh_interval_ms(60_000)
//!     .build()?;
//!
//! let scheduler =
//!     RefreshScheduler::new(config, source, Arc::new(MetricsObserver::new()), &health)?;
//! let handle = scheduler.start_and_wait().await?;
//!
//! // ... serve reads from the store ...
//!
//! handle.shutdown().await;
//! ```

pub mod config;
pub mod health;
pub mod observe;
pub mod sync;

// Re-exports
pub use config::{RefreshConfig, RefreshConfigBuilder};
pub use health::{ComponentHealth, HealthComponent, HealthRegistry};
pub use observe::{InMemoryObserver, MetricsObserver, NoopObserver, RefreshObserver};
pub use sync::{
    RefreshHandle, RefreshOutcome, RefreshScheduler, RefreshState, RefreshStatus, StoreStatus,
};

// Re-export rotor_core for consumers
pub use rotor_core;
pub use rotor_core::{Lifecycle, StoreError, Version, VersionedSource};
