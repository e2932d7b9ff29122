//! Error types for PromptDesk.

use thiserror::Error;

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AlreadyExists,
    Upstream,
    MalformedResponse,
    Storage,
}

#[derive(Error, Debug)]
pub enum PromptDeskError {
    #[error("Invalid {field}: {reason}")]
    InvalidIdentifier { field: &'static str, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Note not found: {project}/{filename}")]
    NoteNotFound { project: String, filename: String },

    #[error("Project already exists: {0}")]
    ProjectAlreadyExists(String),

    #[error("Completions request failed: {0}")]
    Upstream(String),

    #[error("Completions API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Malformed completions response: {0}")]
    MalformedResponse(String),

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PromptDeskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } | Self::InvalidRequest(_) => ErrorKind::InvalidInput,
            Self::ProjectNotFound(_) | Self::NoteNotFound { .. } => ErrorKind::NotFound,
            Self::ProjectAlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Upstream(_) | Self::UpstreamStatus { .. } => ErrorKind::Upstream,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Storage { .. } | Self::Json(_) => ErrorKind::Storage,
        }
    }

    /// Wrap an I/O failure with a short description of what was attempted.
    pub(crate) fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for PromptDeskError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
