//! HTTP metrics middleware.
//!
//! Requests are labelled by route template, so `/stores/keys/refresh` counts
//! under `/stores/{name}/refresh`. Routes addressing one store also carry a
//! `store` label; it stays empty for every other route and for unknown
//! stores, which keeps the label set bounded by the configured stores.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;

const STORE_ROUTE_PREFIX: &str = "/stores/{name}";

/// Middleware que registra metricas HTTP para cada request.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = matched_path
        .as_ref()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let store = store_label(&route, request.uri().path());

    let response = next.run(request).await;

    let status = response.status();
    // Un 404 en una ruta de store es un nombre desconocido: no se etiqueta.
    let store = if status == StatusCode::NOT_FOUND {
        String::new()
    } else {
        store
    };

    counter!(
        "rotor_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "store" => store.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "rotor_http_request_duration_seconds",
        "method" => method,
        "route" => route,
        "store" => store
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Returns the store addressed by `path` when `route` is a per-store route.
fn store_label(route: &str, path: &str) -> String {
    if !route.starts_with(STORE_ROUTE_PREFIX) {
        return String::new();
    }

    path.strip_prefix("/stores/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or_default()
        .to_string()
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "rotor_http_requests_total",
        "HTTP requests by route, store and status"
    );
    metrics::describe_histogram!(
        "rotor_http_request_duration_seconds",
        "HTTP request duration in seconds by route and store"
    );
}
