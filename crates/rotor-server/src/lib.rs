//! Rotor Server - HTTP surface for refreshed stores
//!
//! Keeps every configured store loaded through a
//! [`rotor_sync::RefreshScheduler`] and exposes their health, status, a
//! manual refresh trigger, and Prometheus metrics over HTTP.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::health::HealthResponse;
pub use server::{create_router, run_server_with_state};
pub use settings::{ServerSettings, StoreSettings};
pub use state::AppState;
