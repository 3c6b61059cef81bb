//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the session is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("parley").to_string_lossy().to_string())
        .unwrap_or_else(|| "./parley_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Chat view behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_message_limit")]
    pub message_limit: u32,
}

fn default_poll_interval() -> u64 {
    7
}

fn default_message_limit() -> u32 {
    50
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            message_limit: default_message_limit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("parley").join("config.toml")),
            Some(PathBuf::from("./parley.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = lookup("PARLEY_API_URL") {
            self.api.base_url = url;
        }

        // Storage overrides
        if let Some(data_dir) = lookup("PARLEY_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Chat overrides
        if let Some(Ok(secs)) = lookup("PARLEY_POLL_INTERVAL_SECS").map(|s| s.parse::<u64>()) {
            self.chat.poll_interval_secs = secs;
        }
        if let Some(Ok(limit)) = lookup("PARLEY_MESSAGE_LIMIT").map(|s| s.parse::<u32>()) {
            self.chat.message_limit = limit;
        }

        // Logging overrides
        if let Some(level) = lookup("PARLEY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PARLEY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Parley Configuration
#
# Environment variables override these settings:
# - PARLEY_API_URL
# - PARLEY_DATA_DIR
# - PARLEY_POLL_INTERVAL_SECS
# - PARLEY_MESSAGE_LIMIT
# - PARLEY_LOG_LEVEL
# - PARLEY_LOG_FORMAT

[api]
# Chat backend URL
base_url = "http://localhost:8000"

[storage]
# Directory holding the persisted session
data_dir = "~/.local/share/parley"

[chat]
# How often the message list is refreshed (seconds)
poll_interval_secs = 7

# How many messages to fetch per refresh
message_limit = 50

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/tmp/parley.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.chat.poll_interval_secs, 7);
        assert_eq!(config.chat.message_limit, 50);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.storage.data_dir, "~/.local/share/parley");
        assert_eq!(config.chat.poll_interval_secs, 7);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [chat]
            poll_interval_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.chat.poll_interval_secs, 3);
        assert_eq!(config.chat.message_limit, 50);
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat\npoll_interval_secs = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PARLEY_API_URL", "http://chat.example:9000"),
            ("PARLEY_DATA_DIR", "/tmp/parley-test"),
            ("PARLEY_POLL_INTERVAL_SECS", "2"),
            ("PARLEY_MESSAGE_LIMIT", "not-a-number"),
            ("PARLEY_LOG_FORMAT", "json"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://chat.example:9000");
        assert_eq!(config.storage.data_path(), PathBuf::from("/tmp/parley-test"));
        assert_eq!(config.chat.poll_interval_secs, 2);
        // Unparseable numbers are ignored
        assert_eq!(config.chat.message_limit, 50);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_data_path_expands_home() {
        let storage = StorageConfig {
            data_dir: "~/.local/share/parley".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.data_path(), home.join(".local/share/parley"));
        }
    }
}
