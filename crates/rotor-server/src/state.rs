//! Application state.

use std::collections::BTreeMap;
use std::sync::Arc;

use rotor_core::Result;
use rotor_sources::{LocalStorage, MetadataSource, VersionedStore};
use rotor_sync::{HealthRegistry, RefreshConfig, RefreshHandle, RefreshObserver, RefreshScheduler};
use tracing::info;

use crate::settings::ServerSettings;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    health: HealthRegistry,
    stores: Arc<BTreeMap<String, RefreshHandle>>,
}

impl AppState {
    /// Creates a new AppState over already started schedulers.
    pub fn new(health: HealthRegistry, handles: Vec<RefreshHandle>) -> Self {
        let stores = handles
            .into_iter()
            .map(|handle| (handle.store_name().to_string(), handle))
            .collect();

        Self {
            health,
            stores: Arc::new(stores),
        }
    }

    /// Builds and starts one scheduler per configured store.
    ///
    /// Returns without waiting for the initial loads; until a store has
    /// loaded, its health component reports it as still starting.
    ///
    /// # Errors
    ///
    /// `StoreError::Configuration` if the data dir or a store entry is
    /// invalid.
    pub fn start(settings: &ServerSettings, observer: Arc<dyn RefreshObserver>) -> Result<Self> {
        let health = HealthRegistry::new();
        let storage = Arc::new(LocalStorage::new(&settings.data_dir)?);

        let mut handles = Vec::new();
        for store in settings.store_settings() {
            let config = RefreshConfig::builder()
                .store_name(&store.name)
                .refresh_interval(settings.refresh_interval())
                .build()?;

            // Entries are kept as raw JSON values; this server only
            // reports on stores, it never reads them.
            let source = MetadataSource::<serde_json::Value, _>::new(
                &store.name,
                Arc::clone(&storage),
                &store.metadata_path,
                VersionedStore::new(),
            );

            let scheduler = RefreshScheduler::new(config, source, Arc::clone(&observer), &health)?;
            info!(store = %store.name, metadata = %store.metadata_path, "Starting store scheduler");
            handles.push(scheduler.start());
        }

        Ok(Self::new(health, handles))
    }

    /// Returns the health registry.
    pub fn health(&self) -> &HealthRegistry {
        &self.health
    }

    /// Returns the scheduler for `name`.
    pub fn store(&self, name: &str) -> Option<&RefreshHandle> {
        self.stores.get(name)
    }

    /// Returns all schedulers ordered by store name.
    pub fn stores(&self) -> impl Iterator<Item = &RefreshHandle> {
        self.stores.values()
    }

    /// Stops every scheduler and waits for them.
    pub async fn shutdown(&self) {
        for handle in self.stores.values() {
            handle.shutdown().await;
        }
    }
}
