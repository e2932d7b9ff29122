//! PromptDesk server library - HTTP surface over the project, note and chat stores.
//!
//! Routes, configuration and application state live here, separate from
//! main.rs, so integration tests can drive the router directly.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use state::AppState;

/// Build the full application: API routes, static frontend fallback, CORS and tracing.
pub fn app(state: Arc<AppState>) -> Router {
    routes::api_routes()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
