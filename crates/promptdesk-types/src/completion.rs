//! Request and catalogue types for the external completions API.

use crate::{ChatMessage, SamplingParams};
use serde::{Deserialize, Serialize};

/// Body POSTed to `<api_base>/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    /// A single-message request carrying one user prompt.
    pub fn single_prompt(model: &str, prompt: &str, sampling: SamplingParams) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            sampling,
        }
    }
}

/// One entry of the upstream model catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u64>,
}
