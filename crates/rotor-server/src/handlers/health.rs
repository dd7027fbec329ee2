use axum::{Json, extract::State, http::StatusCode};
use rotor_sync::ComponentHealth;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentHealth>,
}

impl HealthResponse {
    /// Builds the response from component health; UP only if all are healthy.
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let status = if components.iter().all(|c| c.healthy) {
            "UP"
        } else {
            "DOWN"
        };

        Self {
            status: status.to_string(),
            components,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == "UP"
    }
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "UP".to_string(),
            components: Vec::new(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse::from_components(state.health().snapshot());

    let status = if response.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, healthy: bool) -> ComponentHealth {
        ComponentHealth {
            name: name.to_string(),
            healthy,
            reason: (!healthy).then(|| "still starting".to_string()),
        }
    }

    #[test]
    fn test_empty_is_up() {
        assert!(HealthResponse::from_components(Vec::new()).is_up());
    }

    #[test]
    fn test_any_unhealthy_component_is_down() {
        let response = HealthResponse::from_components(vec![
            component("keys-rotator", true),
            component("salts-rotator", false),
        ]);
        assert_eq!(response.status, "DOWN");
    }
}
