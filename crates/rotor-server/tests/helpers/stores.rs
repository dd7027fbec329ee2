//! Stores de prueba sobre almacenamiento embebido.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rotor_server::AppState;
use rotor_sources::{EmbeddedStorage, MetadataSource, ObjectStorage, VersionedStore};
use rotor_sync::rotor_core::Result;
use rotor_sync::{HealthRegistry, NoopObserver, RefreshConfig, RefreshScheduler};

/// Embedded storage whose objects can be swapped while schedulers run.
#[derive(Clone, Default)]
pub struct SharedStorage {
    inner: Arc<RwLock<EmbeddedStorage>>,
}

impl ObjectStorage for SharedStorage {
    fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.inner.read().download(path)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.inner.read().list(prefix)
    }

    fn name(&self) -> &str {
        "shared"
    }
}

/// Publishes `count` keys as `version` of the "keys" store.
pub fn publish_keys(storage: &SharedStorage, version: i64, count: usize) {
    let keys: Vec<usize> = (0..count).collect();
    let location = format!("keys/keys-{}.json", version);
    let metadata = format!(r#"{{"version": {}, "location": "{}"}}"#, version, location);

    let mut inner = storage.inner.write();
    *inner = std::mem::take(&mut *inner)
        .with_object(location, serde_json::to_vec(&keys).unwrap())
        .with_object("keys/metadata.json", metadata.into_bytes());
}

/// Starts a "keys" store over shared storage and waits for its first
/// load when `published` is set.
pub async fn embedded_state(published: bool) -> (AppState, SharedStorage) {
    let storage = SharedStorage::default();
    if published {
        publish_keys(&storage, 1, 3);
    }

    let health = HealthRegistry::new();
    let source = MetadataSource::<u64, _>::new(
        "keys",
        storage.clone(),
        "keys/metadata.json",
        VersionedStore::new(),
    );
    let scheduler = RefreshScheduler::new(
        RefreshConfig::new("keys", Duration::from_secs(3600)),
        source,
        Arc::new(NoopObserver),
        &health,
    )
    .unwrap();

    let handle = scheduler.start();
    if published {
        handle.started().await.unwrap();
    }

    (AppState::new(health, vec![handle]), storage)
}
