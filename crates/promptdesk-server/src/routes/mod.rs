//! HTTP route handlers.

pub mod history;
pub mod models;
pub mod notes;
pub mod projects;
pub mod query;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `{"status": "..."}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Json<Self> {
        Json(Self {
            status: status.into(),
        })
    }
}

/// Every API route, without middleware or the static fallback.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Completion mediation
        .route("/query", post(query::submit))
        // Chat history
        .route("/history/{chat_id}", get(history::get).delete(history::clear))
        // Projects
        .route("/projects", get(projects::list))
        .route(
            "/projects/{project_id}",
            post(projects::create).delete(projects::delete),
        )
        .route("/projects/{project_id}/chats", get(projects::chats))
        .route("/projects/{project_id}/chats/files", get(projects::chat_files))
        // Notes
        .route("/projects/{project_id}/notes", get(notes::list))
        .route(
            "/projects/{project_id}/notes/{filename}",
            get(notes::get).post(notes::save),
        )
        // Other routes
        .route("/models", get(models::list))
        .route("/health", get(health))
}
