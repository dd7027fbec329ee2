//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Buckets para histogramas (en segundos). Refresh attempts run from
/// milliseconds up to tens of seconds for large stores.
const BUCKETS: &[f64] = &[
    0.0005, // 500 microsegundos
    0.001,  // 1 milisegundo
    0.005,  // 5 milisegundos
    0.01,   // 10 milisegundos
    0.025,  // 25 milisegundos
    0.05,   // 50 milisegundos
    0.1,    // 100 milisegundos
    0.25,   // 250 milisegundos
    0.5,    // 500 milisegundos
    1.0,    // 1 segundo
    2.5,    // 2.5 segundos
    5.0,    // 5 segundos
    10.0,   // 10 segundos
    30.0,   // 30 segundos
];

/// Inicializa el sistema de metricas y retorna el handle para el endpoint.
///
/// Installs the global recorder, so call it once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(BUCKETS)?
        .install_recorder()?;

    super::http::register_http_metrics();
    rotor_sync::observe::register_store_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Handle backed by a recorder that is not installed globally.
///
/// Renders only what was recorded through it, which is nothing; meant
/// for routers built in tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
