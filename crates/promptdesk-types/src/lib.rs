//! Shared types for the PromptDesk service.

mod chat;
mod completion;
mod note;
mod query;

pub use chat::*;
pub use completion::*;
pub use note::*;
pub use query::*;
