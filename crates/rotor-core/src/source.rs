//! Versioned source abstraction.

use std::sync::Arc;

use crate::error::Result;
use crate::types::Version;

/// A source of versioned content that a scheduler keeps loaded.
///
/// The three calls split a refresh into a cheap probe (`metadata` and
/// `version`) and an expensive load (`load_content`) that only runs when
/// the probe reports a newer version than the one already loaded.
///
/// Implementations may block on disk or network I/O: the scheduler
/// always calls them from a blocking worker thread, never from the
/// async runtime.
///
/// # Example
///
/// ```
/// use rotor_core::{Result, Version, VersionedSource};
///
/// struct Fixed;
///
/// impl VersionedSource for Fixed {
///     type Metadata = i64;
///
///     fn metadata(&self) -> Result<i64> {
///         Ok(3)
///     }
///
///     fn version(&self, metadata: &i64) -> Result<Version> {
///         Ok(Version::new(*metadata))
///     }
///
///     fn load_content(&self, _metadata: &i64) -> Result<u64> {
///         Ok(10)
///     }
/// }
///
/// let source = Fixed;
/// let meta = source.metadata().unwrap();
/// assert_eq!(source.version(&meta).unwrap(), Version::new(3));
/// ```
pub trait VersionedSource: Send + Sync + 'static {
    /// Small descriptor of the remote content.
    type Metadata: Send + 'static;

    /// Fetches the current remote metadata.
    ///
    /// # Errors
    ///
    /// `StoreError::Fetch` (or an I/O error) if the metadata is
    /// unreachable or malformed.
    fn metadata(&self) -> Result<Self::Metadata>;

    /// Derives the version token from fetched metadata.
    fn version(&self, metadata: &Self::Metadata) -> Result<Version>;

    /// Fetches and loads the content described by `metadata`, returning
    /// the number of entries loaded.
    ///
    /// # Errors
    ///
    /// `StoreError::Load` if the content could not be retrieved or parsed.
    fn load_content(&self, metadata: &Self::Metadata) -> Result<u64>;
}

impl<T: VersionedSource> VersionedSource for Arc<T> {
    type Metadata = T::Metadata;

    fn metadata(&self) -> Result<Self::Metadata> {
        (**self).metadata()
    }

    fn version(&self, metadata: &Self::Metadata) -> Result<Version> {
        (**self).version(metadata)
    }

    fn load_content(&self, metadata: &Self::Metadata) -> Result<u64> {
        (**self).load_content(metadata)
    }
}
