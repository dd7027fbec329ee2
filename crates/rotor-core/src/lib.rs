//! Rotor Core - Domain types and traits
//!
//! This crate provides the foundational types shared by the Rotor
//! refresh scheduler, its sources, and the server: versions, store
//! snapshots, lifecycle and health states, the error taxonomy, and the
//! [`VersionedSource`] capability a scheduler consumes.

pub mod error;
pub mod source;
pub mod types;

pub use error::{Result, StoreError};
pub use source::VersionedSource;
pub use types::{HealthStatus, Lifecycle, StoreSnapshot, Version};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
