//! Chat history types.
//!
//! A chat is an ordered list of [`Turn`]s. Each turn records one prompt, the
//! model's reply, and the sampling parameters that produced it. Turns are
//! stored as flat JSON objects so chat files stay readable by hand:
//!
//! ```json
//! {"prompt": "hi", "response": "hello", "model": "m",
//!  "temperature": 0.7, "top_p": 1.0, "top_k": 0, "frequency_penalty": 0.0}
//! ```

use serde::{Deserialize, Serialize};

/// Numeric sampling controls passed through to the completions API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// 0 means unbounded. Must be a non-negative JSON integer: `-1` and
    /// `40.0` fail deserialization, so a query carrying them is rejected
    /// before anything is sent upstream.
    #[serde(default)]
    pub top_k: u32,
    #[serde(default)]
    pub frequency_penalty: f64,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    1.0
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: 0,
            frequency_penalty: 0.0,
        }
    }
}

/// One prompt/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub prompt: String,
    pub response: String,
    pub model: String,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

impl Turn {
    pub fn new(
        prompt: impl Into<String>,
        response: impl Into<String>,
        model: impl Into<String>,
        sampling: SamplingParams,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            model: model.into(),
            sampling,
        }
    }
}

/// Role of a message sent to the completions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in an outbound completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}
