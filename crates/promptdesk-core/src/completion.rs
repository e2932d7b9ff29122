//! HTTP client for an OpenRouter-compatible completions API.

use crate::{PromptDeskError, Result};
use async_trait::async_trait;
use promptdesk_types::{CompletionRequest, ModelInfo};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Upstream error bodies are truncated to this many characters in errors.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// The external completions collaborator.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request and return the first choice's text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Fetch the upstream model catalogue.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_base: String,
    /// Bearer credential. Requests are sent unauthenticated when absent.
    pub api_key: Option<String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    PromptDeskError::InvalidRequest(format!("invalid API key header: {e}"))
                })?;
                bearer.set_sensitive(true);
                headers.insert(AUTHORIZATION, bearer);
            }
            _ => {
                warn!(
                    target: "promptdesk::upstream",
                    "No API key configured; completion requests will be unauthenticated"
                );
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        format!("{base}/{path}")
    }

    /// Send a request and decode the JSON body of a 2xx response.
    async fn send_json(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PromptDeskError::UpstreamStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| PromptDeskError::MalformedResponse(format!("body is not JSON: {e}")))
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = self.endpoint("chat/completions");
        debug!(target: "promptdesk::upstream", "POST {} (model: {})", url, request.model);

        let body = self.send_json(self.client.post(&url).json(request)).await?;
        extract_reply(&body)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self.endpoint("models");
        debug!(target: "promptdesk::upstream", "GET {}", url);

        let mut body = self.send_json(self.client.get(&url)).await?;
        let data = body
            .get_mut("data")
            .map(Value::take)
            .ok_or_else(|| PromptDeskError::MalformedResponse("missing `data` array".into()))?;
        serde_json::from_value(data)
            .map_err(|e| PromptDeskError::MalformedResponse(format!("invalid model entry: {e}")))
    }
}

/// Pull `choices[0].message.content` out of a completions response.
pub fn extract_reply(body: &Value) -> Result<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            PromptDeskError::MalformedResponse(
                "missing choices[0].message.content in response".to_string(),
            )
        })
}
