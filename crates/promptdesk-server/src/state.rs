//! Shared application state.

use crate::config::Config;
use promptdesk_core::{
    ChatHistoryStore, CompletionClient, CompletionMediator, OpenRouterClient, OpenRouterConfig,
    ProjectStore,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub projects: Arc<ProjectStore>,
    pub history: Arc<ChatHistoryStore>,
    pub mediator: CompletionMediator,
    pub config: Config,
}

impl AppState {
    /// Build state talking to the configured completions API.
    pub fn new(config: Config) -> promptdesk_core::Result<Self> {
        let client = OpenRouterClient::new(OpenRouterConfig {
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })?;
        Self::with_client(config, Arc::new(client))
    }

    /// Build state around an arbitrary completions client.
    ///
    /// Creates the projects root and default project, then loads every
    /// persisted chat.
    pub fn with_client(
        config: Config,
        client: Arc<dyn CompletionClient>,
    ) -> promptdesk_core::Result<Self> {
        let projects = Arc::new(ProjectStore::new(&config.projects_root));
        projects.ensure_layout(&config.default_project)?;

        let history = Arc::new(ChatHistoryStore::open(
            &config.projects_root,
            config.default_project.clone(),
            config.legacy_chat_dir.clone(),
        )?);

        let mediator = CompletionMediator::new(client, projects.clone(), history.clone());

        Ok(Self {
            projects,
            history,
            mediator,
            config,
        })
    }
}
