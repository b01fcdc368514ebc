//! Configuration Management
//!
//! Settings for the service endpoint, local storage, the chat assistant and
//! logging. Read from a TOML file, then overridden by the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "SKILLPATH_API_URL";

const APP_DIR: &str = "skillpath";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Defaults to `<data dir>/skillpath/storage.json`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_messages: usize,
    pub auto_reanalyze: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_messages: 200,
            auto_reanalyze: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    pub default_limit: u32,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            chat: ChatConfig::default(),
            resources: ResourcesConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location when `None`.
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    /// Where the token and transcript are persisted
    pub fn storage_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("storage.json")
        })
    }

    /// Get configuration summary for display
    pub fn summary(&self) -> Vec<String> {
        vec![
            "Configuration".to_string(),
            "".to_string(),
            "Service".to_string(),
            format!("  Base URL: {}", self.api.base_url),
            format!("  Timeout: {}s", self.api.timeout_secs),
            "".to_string(),
            "Storage".to_string(),
            format!("  Path: {}", self.storage_path().display()),
            "".to_string(),
            "Chat".to_string(),
            format!("  Max Messages: {}", self.chat.max_messages),
            format!("  Auto Re-analyze: {}", self.chat.auto_reanalyze),
            "".to_string(),
            format!("Resources Limit: {}", self.resources.default_limit),
            format!("Log Level: {}", self.log_level),
        ]
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
