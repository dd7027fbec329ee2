//! Store status and manual refresh endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rotor_sync::{RefreshOutcome, StoreStatus};

use crate::error::AppError;
use crate::state::AppState;

/// GET /stores
pub async fn list_stores(State(state): State<AppState>) -> Json<Vec<StoreStatus>> {
    Json(state.stores().map(|handle| handle.status()).collect())
}

/// GET /stores/{name}
pub async fn get_store(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StoreStatus>, AppError> {
    let handle = state.store(&name).ok_or(AppError::StoreNotFound(name))?;
    Ok(Json(handle.status()))
}

/// POST /stores/{name}/refresh
///
/// Runs one refresh right away. A failed attempt answers 503 with the
/// outcome in the body; the store keeps its previous content.
pub async fn refresh_store(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<RefreshOutcome>), AppError> {
    let handle = state.store(&name).ok_or(AppError::StoreNotFound(name))?;
    let outcome = handle.refresh_now().await;

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Ok((status, Json(outcome)))
}
