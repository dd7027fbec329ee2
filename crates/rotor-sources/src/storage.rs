//! Read-only object storage backends.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use rotor_core::{Result, StoreError};
use tracing::debug;

/// Read-only access to a bucket-like object store.
///
/// Paths are `/`-separated keys. Implementations may block on I/O; they
/// are only called from the scheduler's blocking workers.
///
/// # Implementors
///
/// - `EmbeddedStorage` - objects held in memory
/// - `LocalStorage` - objects under a local directory
pub trait ObjectStorage: Send + Sync + 'static {
    /// Downloads the object at `path`.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no object exists at `path`
    /// - `StoreError::Io` if the backend fails to read it
    fn download(&self, path: &str) -> Result<Vec<u8>>;

    /// Lists object paths starting with `prefix`.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Returns a form of `path` that is safe to log.
    fn mask(&self, path: &str) -> String {
        path.to_string()
    }

    /// Returns the name of this backend.
    fn name(&self) -> &str;
}

impl<S: ObjectStorage + ?Sized> ObjectStorage for Arc<S> {
    fn download(&self, path: &str) -> Result<Vec<u8>> {
        (**self).download(path)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).list(prefix)
    }

    fn mask(&self, path: &str) -> String {
        (**self).mask(path)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Objects bundled in memory, typically from `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedStorage {
    objects: BTreeMap<String, Vec<u8>>,
    resource_list: Option<Vec<String>>,
}

impl EmbeddedStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object.
    pub fn with_object(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(path.into(), content.into());
        self
    }

    /// Restricts `list` to an explicit set of paths.
    pub fn with_resource_list<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.resource_list = Some(paths.into_iter().map(Into::into).collect());
        self
    }
}

impl ObjectStorage for EmbeddedStorage {
    fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let paths = match &self.resource_list {
            Some(list) => list.iter().filter(|p| p.starts_with(prefix)).cloned().collect(),
            None => self
                .objects
                .keys()
                .filter(|p| p.starts_with(prefix))
                .cloned()
                .collect(),
        };
        Ok(paths)
    }

    fn name(&self) -> &str {
        "embedded"
    }
}

/// Objects stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates a storage rooted at `root`.
    ///
    /// # Errors
    ///
    /// `StoreError::Configuration` if `root` is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::config(format!(
                "storage root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an object path against the root, refusing to leave it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {},
                _ => return Err(StoreError::not_found(path)),
            }
        }
        Ok(resolved)
    }
}

impl ObjectStorage for LocalStorage {
    fn download(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.resolve(path)?;
        debug!(path = %file.display(), "Reading object");

        match fs::read(&file) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::not_found(path)),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let dir = self.resolve(prefix)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let base = prefix.trim_end_matches('/');
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            paths.push(if base.is_empty() {
                name
            } else {
                format!("{}/{}", base, name)
            });
        }
        paths.sort();
        Ok(paths)
    }

    fn name(&self) -> &str {
        "local"
    }
}
