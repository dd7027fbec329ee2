//! Rotor Sources - storage backends and versioned sources
//!
//! This crate provides the pieces a [`rotor_core::VersionedSource`] is
//! usually built from: read-only object storage, content format
//! detection, and the [`VersionedStore`] that readers consult.
//!
//! # Example
//!
//! ```
//! use rotor_core::VersionedSource;
//! use rotor_sources::{EmbeddedStorage, MetadataSource, VersionedStore};
//!
//! let storage = EmbeddedStorage::new()
//!     .with_object("keys/metadata.json", br#"{"version": 2, "location": "keys/keys.json"}"#.to_vec())
//!     .with_object("keys/keys.json", b"[1, 2, 3]".to_vec());
//!
//! let store: VersionedStore<u32> = VersionedStore::new();
//! let source = MetadataSource::new("keys", storage, "keys/metadata.json", store.clone());
//!
//! let metadata = source.metadata().unwrap();
//! assert_eq!(source.load_content(&metadata).unwrap(), 3);
//! assert_eq!(store.snapshot().unwrap().entries(), &[1, 2, 3]);
//! ```

pub mod format;
pub mod metadata;
pub mod storage;
pub mod store;

pub use format::ContentFormat;
pub use metadata::{MetadataSource, StoreMetadata};
pub use storage::{EmbeddedStorage, LocalStorage, ObjectStorage};
pub use store::{StoreContent, VersionedStore};
