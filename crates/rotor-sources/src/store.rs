//! In-process versioned store.

use std::sync::Arc;

use parking_lot::RwLock;
use rotor_core::Version;

/// One loaded version of a store's entries.
#[derive(Debug)]
pub struct StoreContent<T> {
    version: Version,
    entries: Vec<T>,
}

impl<T> StoreContent<T> {
    /// Returns the loaded version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the loaded entries.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Returns the number of loaded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared handle to the current content of a store.
///
/// Readers take an `Arc` to the current content and never see a
/// partially replaced store. Clones share the same content.
#[derive(Debug)]
pub struct VersionedStore<T> {
    current: Arc<RwLock<Option<Arc<StoreContent<T>>>>>,
}

impl<T> VersionedStore<T> {
    /// Creates an unloaded store.
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the current content, or `None` before the first load.
    pub fn snapshot(&self) -> Option<Arc<StoreContent<T>>> {
        self.current.read().clone()
    }

    /// Returns the loaded version, or `Version::UNLOADED`.
    pub fn version(&self) -> Version {
        self.current
            .read()
            .as_ref()
            .map_or(Version::UNLOADED, |c| c.version)
    }

    /// Swaps in a new version.
    pub fn replace(&self, version: Version, entries: Vec<T>) {
        let content = Arc::new(StoreContent { version, entries });
        *self.current.write() = Some(content);
    }
}

impl<T> Clone for VersionedStore<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<T> Default for VersionedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
