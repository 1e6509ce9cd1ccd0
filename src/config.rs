//! Service configuration — artifact locations, HTTP binds, chat bot settings.
//!
//! Stored as `{config_dir}/config.json`. Every field has a default, so a
//! partial file only overrides what it names. Environment variables win
//! over the file; CLI flags win over both (applied by the binary).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    BOT_REQUEST_TIMEOUT_SECS, DEFAULT_API_BASE, DEFAULT_API_BIND, DEFAULT_BOT_BIND,
    DEFAULT_RECOMMEND_K, ENV_API_BASE, ENV_DATA_DIR, ENV_MODELS_DIR,
};
use crate::storage::path_utils::{self, ArtifactPaths};

// ============================================================================
// HTTP API
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub bind: String,
    /// Permissive CORS (any origin, method, header).
    pub cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_API_BIND.to_string(),
            cors: true,
        }
    }
}

// ============================================================================
// CHAT BOT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub bind: String,
    /// Base URL of the recommendation API the bot forwards intents to.
    pub api_base: String,
    pub timeout_secs: u64,
    /// Number of items requested per recommendation/similarity intent.
    pub default_k: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BOT_BIND.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: BOT_REQUEST_TIMEOUT_SECS,
            default_k: DEFAULT_RECOMMEND_K,
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding `products.csv`.
    pub data_dir: PathBuf,
    /// Directory holding popularity, user ids and the model artifacts.
    pub models_dir: PathBuf,
    pub api: ApiConfig,
    pub bot: BotConfig,
    /// Append logs to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            models_dir: PathBuf::from("models"),
            api: ApiConfig::default(),
            bot: BotConfig::default(),
            log_file: None,
        }
    }
}

impl ServiceConfig {
    /// Load from `{config_dir}/config.json`, then apply environment overrides.
    /// Returns defaults if the file is missing or invalid.
    pub fn load() -> Self {
        let mut config = Self::load_from(&path_utils::config_path());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load from an explicit file without environment overrides.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Invalid service config, using defaults"
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Apply `PRODUCT_RECS_DATA_DIR`, `PRODUCT_RECS_MODELS_DIR`, `REC_API_BASE`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_MODELS_DIR).filter(|v| !v.is_empty()) {
            self.models_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_API_BASE).filter(|v| !v.is_empty()) {
            self.bot.api_base = v;
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.data_dir, &self.models_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"models_dir":"/srv/models","bot":{"timeout_secs":2}}"#).unwrap();

        let config = ServiceConfig::load_from(&path);
        assert_eq!(config.models_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.bot.timeout_secs, 2);
        assert_eq!(config.bot.api_base, DEFAULT_API_BASE);
        assert_eq!(config.api, ApiConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert_eq!(ServiceConfig::load_from(&path), ServiceConfig::default());
        assert_eq!(ServiceConfig::load_from(&dir.path().join("missing.json")), ServiceConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServiceConfig::default();
        config.apply_env(|key| match key {
            ENV_DATA_DIR => Some("/data".to_string()),
            ENV_API_BASE => Some("http://api:9000".to_string()),
            ENV_MODELS_DIR => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.models_dir, PathBuf::from("models"));
        assert_eq!(config.bot.api_base, "http://api:9000");
        assert_eq!(config.artifact_paths().catalog, PathBuf::from("/data/products.csv"));
    }
}
