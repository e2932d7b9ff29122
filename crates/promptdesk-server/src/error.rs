//! Mapping from core errors to HTTP responses.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptdesk_core::{ErrorKind, PromptDeskError};
use serde::Serialize;

const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to get response from completions API";
const MALFORMED_RESPONSE_MESSAGE: &str = "Completions API returned an unexpected response";

/// JSON error payload: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    Core(PromptDeskError),
    /// Request body refused by the JSON extractor; keeps axum's status.
    Body(JsonRejection),
}

impl From<PromptDeskError> for ApiError {
    fn from(err: PromptDeskError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let err = match self {
            Self::Core(err) => err,
            Self::Body(rejection) => return rejection.status(),
        };
        match err.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Upstream | ErrorKind::MalformedResponse => StatusCode::BAD_GATEWAY,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Upstream details stay in the logs.
    pub fn message(&self) -> String {
        let err = match self {
            Self::Core(err) => err,
            Self::Body(rejection) => return rejection.body_text(),
        };
        match err.kind() {
            ErrorKind::Upstream => UPSTREAM_FAILURE_MESSAGE.to_string(),
            ErrorKind::MalformedResponse => MALFORMED_RESPONSE_MESSAGE.to_string(),
            _ => err.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core(err) => write!(f, "{err}"),
            Self::Body(rejection) => f.write_str(&rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(target: "promptdesk::api", "Request failed ({}): {}", status, self);
        } else if let Self::Body(rejection) = &self {
            tracing::debug!(target: "promptdesk::api", "Rejected request body: {}", rejection);
        }
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}

/// `axum::Json` whose rejections answer with an [`ErrorBody`] like every
/// other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
