//! Error types for Rotor.
//!
//! This module defines the error hierarchy used throughout the Rotor
//! system. All errors implement the standard `std::error::Error` trait
//! via `thiserror`.
//!
//! # Error Handling Philosophy
//!
//! - Sources return `Result<T, StoreError>` from every fallible call
//! - A failed refresh is a value, never a panic or a process exit
//! - Fetch and load failures are caught at the refresh boundary; only
//!   configuration errors escape to the caller, and only at construction
//!
//! # Example
//!
//! ```
//! use rotor_core::{Result, StoreError, Version};
//!
//! fn parse_version(store: &str, raw: &str) -> Result<Version> {
//!     raw.parse::<i64>()
//!         .map(Version::new)
//!         .map_err(|e| StoreError::fetch(store, format!("bad version '{}': {}", raw, e)))
//! }
//!
//! assert!(parse_version("keys", "12").is_ok());
//! assert!(parse_version("keys", "twelve").unwrap_err().is_fetch_error());
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Rotor operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Remote metadata was unreachable or malformed.
    #[error("failed to fetch metadata for store '{store}': {reason}")]
    Fetch {
        /// Store whose metadata could not be fetched
        store: String,
        /// Description of the failure
        reason: String,
    },

    /// Content was retrieved but could not be loaded into the store.
    #[error("failed to load content for store '{store}': {reason}")]
    Load {
        /// Store whose content failed to load
        store: String,
        /// Description of the failure
        reason: String,
    },

    /// Invalid scheduler or source configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Failed to parse a fetched document.
    #[error("parse error in {path}: {reason}")]
    Parse {
        /// Path of the document
        path: PathBuf,
        /// Description of the parse error
        reason: String,
    },

    /// The requested object does not exist in storage.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The worker running a refresh attempt died.
    #[error("refresh worker failed: {0}")]
    Worker(String),

    /// The scheduler was shut down before the operation completed.
    #[error("scheduler is shut down")]
    Shutdown,
}

impl StoreError {
    /// Creates a Fetch error.
    pub fn fetch(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            store: store.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Load error.
    pub fn load(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            store: store.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a Parse error.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Returns true if this error came from fetching metadata.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Returns true if this error came from loading content.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Type alias for Results with StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;
