//! Rotor Server binary.

use std::sync::Arc;

use anyhow::Context;
use rotor_server::{AppState, ServerSettings, metrics::init_metrics, run_server_with_state};
use rotor_sync::MetricsObserver;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ServerSettings::load().context("failed to load settings")?;
    let addr = settings.socket_addr()?;

    tracing::info!("Starting Rotor Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data dir: {}", settings.data_dir.display());
    tracing::info!("Refresh interval: {}ms", settings.refresh_interval_ms);

    let prometheus = init_metrics().context("failed to install metrics recorder")?;

    // Stores load in the background; /health reports DOWN until they have.
    let state = AppState::start(&settings, Arc::new(MetricsObserver::new()))
        .context("failed to start store schedulers")?;

    let served = run_server_with_state(addr, state.clone(), prometheus).await;

    tracing::info!("Stopping store schedulers");
    state.shutdown().await;

    served.context("server error")
}
