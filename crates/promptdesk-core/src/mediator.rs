//! Completion mediator: one inbound query, one outbound completion, one turn.

use crate::validate::{validate_chat_id, validate_project_id};
use crate::{ChatHistoryStore, CompletionClient, ProjectStore, PromptDeskError, Result};
use promptdesk_types::{CompletionRequest, ModelInfo, QueryRequest};
use std::sync::Arc;
use tracing::{error, info};

const LOG_PREVIEW_CHARS: usize = 100;

pub struct CompletionMediator {
    client: Arc<dyn CompletionClient>,
    projects: Arc<ProjectStore>,
    history: Arc<ChatHistoryStore>,
}

impl CompletionMediator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        projects: Arc<ProjectStore>,
        history: Arc<ChatHistoryStore>,
    ) -> Self {
        Self {
            client,
            projects,
            history,
        }
    }

    /// Forward a query to the completions API and record the resulting turn.
    ///
    /// Nothing is appended unless the upstream call succeeds and its reply
    /// has the expected shape.
    pub async fn complete(&self, request: QueryRequest) -> Result<String> {
        validate_project_id(&request.project_id)?;
        validate_chat_id(&request.chat_id)?;
        if request.model.trim().is_empty() {
            return Err(PromptDeskError::InvalidRequest("model cannot be empty".into()));
        }
        if !self.projects.exists(&request.project_id) {
            return Err(PromptDeskError::ProjectNotFound(request.project_id));
        }

        info!(
            target: "promptdesk::api",
            "Query for chat '{}' in project '{}' (model: {})",
            request.chat_id, request.project_id, request.model
        );

        let outbound =
            CompletionRequest::single_prompt(&request.model, &request.prompt, request.sampling);

        let reply = match self.client.complete(&outbound).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(target: "promptdesk::upstream", "Completion request failed: {}", e);
                return Err(e);
            }
        };

        info!(
            target: "promptdesk::upstream",
            "Reply received: {}",
            preview(&reply)
        );

        let project_id = request.project_id.clone();
        let chat_id = request.chat_id.clone();
        self.history
            .append(&project_id, &chat_id, request.into_turn(reply.clone()))?;

        Ok(reply)
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.client.list_models().await.inspect_err(|e| {
            error!(target: "promptdesk::upstream", "Model catalogue request failed: {}", e);
        })
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
