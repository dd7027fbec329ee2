//! Cliente HTTP en memoria para los tests.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusHandle;
use rotor_server::{AppState, create_router, metrics::detached_handle};
use rotor_sync::HealthRegistry;
use tower::ServiceExt;

/// Sends requests straight into the router, no socket involved.
pub struct TestClient {
    app: Router,
}

impl TestClient {
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, &[]).await
    }

    pub async fn get_with_headers(&self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.send(Method::GET, uri, headers).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, &[]).await
    }

    /// GET `/stores/{name}`.
    pub async fn store(&self, name: &str) -> TestResponse {
        self.get(&format!("/stores/{}", name)).await
    }

    /// POST `/stores/{name}/refresh`.
    pub async fn refresh(&self, name: &str) -> TestResponse {
        self.post(&format!("/stores/{}/refresh", name)).await
    }

    async fn send(&self, method: Method, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let request = headers
            .iter()
            .fold(Request::builder().method(method).uri(uri), |builder, (k, v)| {
                builder.header(*k, *v)
            })
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }
}

/// Status, headers and the fully read body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON body ({}): {}", e, self.text()))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Asserts the status, showing the body on mismatch.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(self.status, expected, "body: {}", self.text());
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(self.header(name), Some(expected), "header '{}'", name);
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.headers.contains_key(name), "missing header '{}'", name);
        self
    }

    pub fn assert_json_content(&self) -> &Self {
        let content_type = self.header("content-type").unwrap_or_default();
        assert!(
            content_type.starts_with("application/json"),
            "content-type: {}",
            content_type
        );
        self
    }
}

/// Cliente sin stores registrados.
pub fn client() -> TestClient {
    client_with(AppState::new(HealthRegistry::new(), Vec::new()))
}

/// Cliente sobre el estado dado.
pub fn client_with(state: AppState) -> TestClient {
    client_with_metrics(state, detached_handle())
}

/// Cliente cuyo `/metrics` renderiza `handle`.
pub fn client_with_metrics(state: AppState, handle: PrometheusHandle) -> TestClient {
    TestClient {
        app: create_router(state, handle),
    }
}
