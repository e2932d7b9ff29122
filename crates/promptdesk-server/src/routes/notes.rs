//! Note route handlers.

use crate::{error::ApiError, state::AppState};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Json,
};
use promptdesk_core::PromptDeskError;
use promptdesk_types::{Note, NoteContent};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct NoteSavedResponse {
    pub status: &'static str,
    pub filename: String,
}

/// GET /projects/{project_id}/notes - Note file names in a project.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.projects.list_notes(&project_id)?))
}

/// GET /projects/{project_id}/notes/{filename} - Read one note.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path((project_id, filename)): Path<(String, String)>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.projects.read_note(&project_id, &filename)?))
}

/// POST /projects/{project_id}/notes/{filename} - Create or overwrite a note.
///
/// Accepts either a JSON `{"content": "..."}` body or the raw note text.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Path((project_id, filename)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NoteSavedResponse>, ApiError> {
    let content = note_content(&headers, &body)?;
    state.projects.write_note(&project_id, &filename, &content)?;

    Ok(Json(NoteSavedResponse {
        status: "saved",
        filename,
    }))
}

fn note_content(headers: &HeaderMap, body: &[u8]) -> Result<String, PromptDeskError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if is_json {
        let parsed: NoteContent = serde_json::from_slice(body)
            .map_err(|e| PromptDeskError::InvalidRequest(format!("invalid note body: {e}")))?;
        return Ok(parsed.content);
    }

    String::from_utf8(body.to_vec())
        .map_err(|_| PromptDeskError::InvalidRequest("note body is not valid UTF-8".into()))
}
