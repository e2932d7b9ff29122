//! Completion query route.

use crate::{
    error::{ApiError, JsonBody},
    state::AppState,
};
use axum::{extract::State, Json};
use promptdesk_types::{QueryRequest, QueryResponse};
use std::sync::Arc;

/// POST /query - Forward a prompt to the completions API and record the turn.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let response = state.mediator.complete(req).await?;
    Ok(Json(QueryResponse { response }))
}
