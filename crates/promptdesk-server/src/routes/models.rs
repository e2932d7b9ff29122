//! Model catalogue route.

use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use promptdesk_types::ModelInfo;
use std::sync::Arc;

/// GET /models - Proxy the upstream model catalogue.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ModelInfo>>, ApiError> {
    Ok(Json(state.mediator.list_models().await?))
}
