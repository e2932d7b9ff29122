//! Core storage and completion mediation for PromptDesk.

mod completion;
mod error;
mod history;
mod mediator;
mod projects;
pub mod validate;

pub use completion::{
    extract_reply, CompletionClient, OpenRouterClient, OpenRouterConfig, DEFAULT_API_BASE,
};
pub use error::{ErrorKind, PromptDeskError};
pub use history::{ChatHistoryStore, FlushStats, LoadStats};
pub use mediator::CompletionMediator;
pub use projects::ProjectStore;

/// Result type for PromptDesk operations.
pub type Result<T> = std::result::Result<T, PromptDeskError>;
