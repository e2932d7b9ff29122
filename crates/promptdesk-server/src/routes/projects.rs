//! Project route handlers.

use super::StatusResponse;
use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use promptdesk_types::Turn;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// GET /projects - Project names under the projects root.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.projects.list_projects())
}

/// POST /projects/{project_id} - Create an empty project.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.projects.create(&project_id)?;
    Ok(StatusResponse::new(format!("Project '{project_id}' created")))
}

/// DELETE /projects/{project_id} - Remove a project with its notes and chats.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.projects.delete(&project_id)?;

    // Keep the shutdown flush from recreating files for a deleted project.
    let evicted = state.history.evict_project(&project_id);
    info!(
        target: "promptdesk::api",
        "Deleted project '{}' ({} chats evicted)", project_id, evicted
    );

    Ok(StatusResponse::new(format!("Project '{project_id}' deleted")))
}

/// GET /projects/{project_id}/chats - Every chat in a project, keyed by chat id.
pub async fn chats(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<BTreeMap<String, Vec<Turn>>>, ApiError> {
    state.projects.project_dir(&project_id)?;
    Ok(Json(state.history.project_chats(&project_id)))
}

/// GET /projects/{project_id}/chats/files - Chat file names in a project.
pub async fn chat_files(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.projects.list_chat_files(&project_id)?))
}
