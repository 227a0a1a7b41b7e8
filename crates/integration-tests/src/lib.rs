//! Integration test harness for Gadget Grove.
//!
//! Builds a full application router on top of a throwaway data directory,
//! so tests can drive the real HTTP surface in process with
//! `tower::ServiceExt::oneshot`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use tempfile::TempDir;

use gadget_grove_server::config::ServerConfig;
use gadget_grove_server::state::AppState;
use gadget_grove_server::store::JsonStore;

/// A test application with its own temporary data directory.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub state: AppState,
    _data_dir: TempDir,
}

impl TestContext {
    /// Create a fresh application over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_payment_secret(Some("sk_test_integration"))
    }

    /// Create a fresh application with payments disabled.
    #[must_use]
    pub fn without_payments() -> Self {
        Self::with_payment_secret(None)
    }

    fn with_payment_secret(payment_secret: Option<&str>) -> Self {
        let data_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            data_dir: data_dir.path().to_path_buf(),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            jwt_secret: SecretString::from("integration-test-signing-secret-0123456789"),
            payment_secret: payment_secret.map(SecretString::from),
        };

        let store = JsonStore::open(&config.data_dir);
        store.initialize().unwrap();

        Self {
            state: AppState::new(config, store),
            _data_dir: data_dir,
        }
    }

    /// Build a router over this context's state.
    #[must_use]
    pub fn app(&self) -> Router {
        gadget_grove_server::app(self.state.clone())
    }

    /// Direct access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &JsonStore {
        self.state.store()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a JSON request.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request.
#[must_use]
pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
