//! Test helpers para rotor-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod stores;

pub use client::{TestClient, TestResponse, client, client_with, client_with_metrics};
pub use stores::{embedded_state, publish_keys};
