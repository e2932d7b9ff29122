//! Common test utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use promptdesk_server::{config::Config, state::AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Config rooted in a temp directory, pointing at `api_base`.
pub fn test_config(temp_dir: &TempDir, api_base: &str) -> Config {
    let static_dir = temp_dir.path().join("static");
    std::fs::create_dir_all(&static_dir).unwrap();

    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir,
        projects_root: temp_dir.path().join("projects"),
        default_project: "default".to_string(),
        legacy_chat_dir: Some(temp_dir.path().to_path_buf()),
        api_base: api_base.to_string(),
        api_key: Some("test-key".to_string()),
    }
}

/// Create the full app over a fresh temp directory.
pub fn create_test_app(api_base: &str) -> (Router, Arc<AppState>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir, api_base);
    let (app, state) = app_for(config);
    (app, state, temp_dir)
}

/// Build state and router from an existing config (e.g. to simulate a restart).
pub fn app_for(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to create AppState"));
    let app = promptdesk_server::app(state.clone());
    (app, state)
}

/// Send a request and return the status with the body parsed as JSON (Null if empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(body.into()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, Body::empty()).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None, Body::empty()).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        uri,
        Some("application/json"),
        serde_json::to_string(body).unwrap(),
    )
    .await
}
