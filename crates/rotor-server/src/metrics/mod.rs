//! Metrics module for the Rotor server.

pub mod http;
pub mod setup;

pub use setup::{init_metrics, detached_handle};
