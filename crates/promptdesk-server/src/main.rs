//! PromptDesk server - mediator between the frontend and a completions API.

use anyhow::Result;
use clap::Parser;
use promptdesk_server::{config, logging, state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use logging::{LogArgs, LogConfig};
use state::AppState;

/// PromptDesk server - chat, project and note storage for an LLM frontend.
#[derive(Parser, Debug)]
#[command(name = "promptdesk-server")]
#[command(about = "HTTP server mediating chat prompts to an OpenRouter-compatible API")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the projects root directory
    #[arg(long, value_name = "DIR")]
    projects_root: Option<PathBuf>,

    /// Bearer credential for the completions API
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogConfig::from(&cli.log));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Apply CLI overrides
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(root) = cli.projects_root {
        config.projects_root = root;
    }
    config.api_key = cli.api_key.filter(|key| !key.trim().is_empty());

    tracing::info!(
        target: "promptdesk::startup",
        "Loaded configuration (port: {}, projects root: {:?}, api base: {})",
        config.port,
        config.projects_root,
        config.api_base
    );

    let state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(
        target: "promptdesk::startup",
        "Initialized application state ({} chats in memory)",
        state.history.len()
    );

    let app = promptdesk_server::app(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "promptdesk::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = state.history.flush_all();
    tracing::info!(
        target: "promptdesk::shutdown",
        "Flushed {} chats on shutdown ({} failed)",
        stats.written,
        stats.failed
    );

    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "promptdesk::shutdown", "Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(target: "promptdesk::shutdown", "Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(target: "promptdesk::shutdown", "Shutdown signal received");
}
