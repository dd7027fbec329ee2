#![allow(dead_code)]
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rotor_core::{Result, StoreError, Version, VersionedSource};

/// Source that serves a fixed sequence of versions, one per metadata call,
/// and reports `version * 10` entries on load.
pub struct CountingSource {
    versions: Mutex<Vec<i64>>,
    loads: AtomicUsize,
}

impl CountingSource {
    pub fn new(mut versions: Vec<i64>) -> Self {
        versions.reverse();
        Self {
            versions: Mutex::new(versions),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl VersionedSource for CountingSource {
    type Metadata = i64;

    fn metadata(&self) -> Result<i64> {
        self.versions
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| StoreError::fetch("counting", "sequence exhausted"))
    }

    fn version(&self, metadata: &i64) -> Result<Version> {
        Ok(Version::new(*metadata))
    }

    fn load_content(&self, metadata: &i64) -> Result<u64> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok((*metadata as u64) * 10)
    }
}
