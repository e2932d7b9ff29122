//! Chat history routes.

use super::StatusResponse;
use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use promptdesk_core::validate::validate_chat_id;
use promptdesk_types::Turn;
use std::sync::Arc;
use tracing::info;

/// GET /history/{chat_id} - Turns of a chat, empty if unknown.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Turn>>, ApiError> {
    validate_chat_id(&chat_id)?;
    Ok(Json(state.history.get(&chat_id)))
}

/// DELETE /history/{chat_id} - Forget a chat. Idempotent.
pub async fn clear(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    if state.history.clear(&chat_id)? {
        info!(target: "promptdesk::api", "Cleared chat '{}'", chat_id);
    }
    Ok(StatusResponse::new(format!("{chat_id} cleared")))
}
