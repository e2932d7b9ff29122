//! Server configuration.

use anyhow::Result;
use promptdesk_core::DEFAULT_API_BASE;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,
    #[serde(default = "default_project")]
    pub default_project: String,
    /// Directory scanned once at startup for pre-project chat files.
    #[serde(default = "default_legacy_chat_dir")]
    pub legacy_chat_dir: Option<PathBuf>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bearer credential for the completions API. Only ever set from the
    /// environment or the command line.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./frontend/dist")
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}

fn default_project() -> String {
    "default".to_string()
}

fn default_legacy_chat_dir() -> Option<PathBuf> {
    Some(PathBuf::from("."))
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            projects_root: default_projects_root(),
            default_project: default_project(),
            legacy_chat_dir: default_legacy_chat_dir(),
            api_base: default_api_base(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }
}
