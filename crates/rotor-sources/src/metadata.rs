//! Versioned source driven by a metadata document.

use std::path::Path;

use rotor_core::{Result, StoreError, Version, VersionedSource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::format::ContentFormat;
use crate::storage::ObjectStorage;
use crate::store::VersionedStore;

/// The metadata document published next to a store's content.
///
/// ```json
/// { "version": 12, "location": "keys/keys-12.json", "generated": 1700000000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Version of the content at `location`.
    pub version: i64,
    /// Storage path of the content.
    pub location: String,
    /// Any other fields, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Loads a list of `T` into a [`VersionedStore`] whenever the metadata
/// document reports a newer version.
pub struct MetadataSource<T, S> {
    name: String,
    storage: S,
    metadata_path: String,
    store: VersionedStore<T>,
}

impl<T, S> MetadataSource<T, S>
where
    T: DeserializeOwned + Send + Sync + 'static,
    S: ObjectStorage,
{
    /// Creates a source reading `metadata_path` from `storage` and
    /// publishing into `store`.
    pub fn new(
        name: impl Into<String>,
        storage: S,
        metadata_path: impl Into<String>,
        store: VersionedStore<T>,
    ) -> Self {
        Self {
            name: name.into(),
            storage,
            metadata_path: metadata_path.into(),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata_path(&self) -> &str {
        &self.metadata_path
    }

    /// Returns the store this source publishes into.
    pub fn store(&self) -> &VersionedStore<T> {
        &self.store
    }
}

impl<T, S> VersionedSource for MetadataSource<T, S>
where
    T: DeserializeOwned + Send + Sync + 'static,
    S: ObjectStorage,
{
    type Metadata = StoreMetadata;

    fn metadata(&self) -> Result<StoreMetadata> {
        debug!(
            store = %self.name,
            storage = self.storage.name(),
            path = %self.storage.mask(&self.metadata_path),
            "Fetching store metadata"
        );

        let bytes = self
            .storage
            .download(&self.metadata_path)
            .map_err(|e| StoreError::fetch(&self.name, e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::fetch(
                &self.name,
                format!("invalid metadata {}: {}", self.metadata_path, e),
            )
        })
    }

    fn version(&self, metadata: &StoreMetadata) -> Result<Version> {
        let version = Version::new(metadata.version);
        if !version.is_newer_than(Version::UNLOADED) {
            return Err(StoreError::fetch(
                &self.name,
                format!(
                    "invalid version {} in {}",
                    metadata.version, self.metadata_path
                ),
            ));
        }
        Ok(version)
    }

    fn load_content(&self, metadata: &StoreMetadata) -> Result<u64> {
        let location = &metadata.location;
        let format = ContentFormat::from_path(Path::new(location)).ok_or_else(|| {
            StoreError::load(&self.name, format!("unsupported content format: {}", location))
        })?;

        debug!(
            store = %self.name,
            path = %self.storage.mask(location),
            %format,
            "Downloading store content"
        );

        let entries: Vec<T> = self
            .storage
            .download(location)
            .and_then(|bytes| format.parse_list(location, &bytes))
            .map_err(|e| StoreError::load(&self.name, e.to_string()))?;

        let count = entries.len() as u64;
        self.store.replace(Version::new(metadata.version), entries);
        Ok(count)
    }
}

impl<T, S: ObjectStorage> std::fmt::Debug for MetadataSource<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataSource")
            .field("name", &self.name)
            .field("storage", &self.storage.name())
            .field("metadata_path", &self.metadata_path)
            .finish()
    }
}
