//! Shared helpers for router-level integration tests.
//!
//! Tests drive the real application (routes + middleware) through
//! `tower::ServiceExt::oneshot` against stores in a per-test tempdir.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crm_server::api;
use crm_server::core::{Config, ServerState, SheetsConfig};
use crm_server::db::factory::StorageBackend;

pub fn test_config(work_dir: &std::path::Path) -> Config {
    Config {
        work_dir: work_dir.to_string_lossy().to_string(),
        http_port: 0,
        db_file: "crm.db".to_string(),
        storage_backend: StorageBackend::File,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_dir: None,
        sheets: SheetsConfig::default(),
    }
}

pub fn test_app(work_dir: &std::path::Path) -> Router {
    let state = ServerState::initialize(&test_config(work_dir));
    api::build_app(&state)
}

/// Fire one request and decode the JSON response body (Null when empty).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
        builder = builder.header("x-user-id", u);
    }
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    };

    let response = app.clone().oneshot(req).await.expect("request succeeds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    request(app, "GET", uri, user, None).await
}

pub async fn post(app: &Router, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
    request(app, "POST", uri, user, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
    request(app, "PUT", uri, user, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, user: Option<&str>, body: Value) -> (StatusCode, Value) {
    request(app, "PATCH", uri, user, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    request(app, "DELETE", uri, user, None).await
}
