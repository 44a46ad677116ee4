//! TOML-based application configuration.
//!
//! Stores:
//! - SMTP connection and mailbox addresses
//! - Daily new/review word quotas
//! - The review interval table
//! - Enrichment switches and timeouts
//! - Word list, state file and log file locations
//! - Statistics server bind address
//!
//! Configuration is stored at `~/.config/wordmail/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::review::{SchedulerConfig, DEFAULT_REVIEW_INTERVALS};

/// Environment variable that overrides `smtp.password`.
pub const SMTP_PASSWORD_ENV: &str = "WORDMAIL_SMTP_PASSWORD";

/// SMTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_server")]
    pub server: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub use_tls: bool,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Sender address. QQ mail requires this to match `username`.
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Daily quota configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConfig {
    #[serde(default = "default_new_count")]
    pub new_count: usize,
    #[serde(default = "default_review_count")]
    pub review_count: usize,
}

/// Review interval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Days until the next review, indexed by mastery level.
    #[serde(default = "default_intervals")]
    pub intervals: Vec<u32>,
}

/// Enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
    /// Pixabay API key. The Pixabay image source is skipped when unset.
    #[serde(default)]
    pub pixabay_key: Option<String>,
}

/// File locations. Unset entries resolve inside the data directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub corpus: Option<PathBuf>,
    #[serde(default)]
    pub state: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Statistics server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/wordmail/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Send a plain-text notice to `smtp.to` when a run fails.
    #[serde(default)]
    pub notify_on_error: bool,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub daily: DailyConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// Default functions
fn default_smtp_server() -> String {
    "smtp.qq.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_true() -> bool {
    true
}
fn default_new_count() -> usize {
    3
}
fn default_review_count() -> usize {
    2
}
fn default_intervals() -> Vec<u32> {
    DEFAULT_REVIEW_INTERVALS.to_vec()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_image_timeout_secs() -> u64 {
    10
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_server_port() -> u16 {
    8080
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: default_smtp_server(),
            port: default_smtp_port(),
            use_tls: true,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
        }
    }
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            new_count: default_new_count(),
            review_count: default_review_count(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            intervals: default_intervals(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            image_timeout_secs: default_image_timeout_secs(),
            pixabay_key: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_server_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notify_on_error: false,
            smtp: SmtpConfig::default(),
            daily: DailyConfig::default(),
            review: ReviewConfig::default(),
            enrichment: EnrichmentConfig::default(),
            paths: PathsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SmtpConfig {
    /// Password from the environment if set, else from the file.
    pub fn resolved_password(&self) -> String {
        std::env::var(SMTP_PASSWORD_ENV).unwrap_or_else(|_| self.password.clone())
    }

    /// Both sender and recipient must be present before a send.
    pub fn ensure_addresses(&self) -> Result<(), ConfigError> {
        if self.from.trim().is_empty() {
            return Err(ConfigError::MissingKey("smtp.from".into()));
        }
        if self.to.trim().is_empty() {
            return Err(ConfigError::MissingKey("smtp.to".into()));
        }
        Ok(())
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Location of `config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if let Some(cfg) = Self::read_from(path)? {
            return Ok(cfg);
        }
        tracing::info!(path = %path.display(), "writing default configuration");
        let cfg = Self::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }

    /// Read the config at the default location without creating it.
    pub fn read_existing() -> Result<Option<Self>, ConfigError> {
        Self::read_from(&Self::path()?)
    }

    /// Parse and validate `path`. A missing file yields `None` and nothing
    /// is written.
    pub fn read_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(load_failed(e.to_string())),
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(Some(cfg))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory by key. Returns error if key is unknown
    /// or the resulting config is invalid.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler_config()
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "review.intervals".into(),
                message: e.to_string(),
            })
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            intervals: self.review.intervals.clone(),
        }
    }

    pub fn corpus_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.corpus {
            Some(p) => Ok(p.clone()),
            None => Ok(data_dir()?.join("words.txt")),
        }
    }

    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.state {
            Some(p) => Ok(p.clone()),
            None => Ok(data_dir()?.join("word_history.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.smtp.port, 587);
        assert_eq!(parsed.review.intervals, vec![1, 2, 4, 7, 15, 30]);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[daily]\nnew_count = 10\n").unwrap();
        assert_eq!(parsed.daily.new_count, 10);
        assert_eq!(parsed.daily.review_count, 2);
        assert!(parsed.smtp.use_tls);
        assert!(!parsed.notify_on_error);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("smtp.use_tls").as_deref(), Some("true"));
        assert_eq!(cfg.get("daily.new_count").as_deref(), Some("3"));
        assert_eq!(cfg.get("server.host").as_deref(), Some("127.0.0.1"));
        assert!(cfg.get("smtp.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_number_and_bool() {
        let mut cfg = Config::default();
        cfg.set_value("daily.review_count", "4").unwrap();
        cfg.set_value("enrichment.enabled", "false").unwrap();
        assert_eq!(cfg.daily.review_count, 4);
        assert!(!cfg.enrichment.enabled);
    }

    #[test]
    fn set_value_fills_optional_path() {
        let mut cfg = Config::default();
        cfg.set_value("paths.corpus", "/tmp/cet4.txt").unwrap();
        assert_eq!(cfg.paths.corpus, Some(PathBuf::from("/tmp/cet4.txt")));
    }

    #[test]
    fn set_value_accepts_interval_array() {
        let mut cfg = Config::default();
        cfg.set_value("review.intervals", "[1, 3, 9]").unwrap();
        assert_eq!(cfg.review.intervals, vec![1, 3, 9]);
    }

    #[test]
    fn set_value_rejects_decreasing_intervals() {
        let mut cfg = Config::default();
        let result = cfg.set_value("review.intervals", "[5, 2]");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.review.intervals, vec![1, 2, 4, 7, 15, 30]);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        let result = cfg.set_value("smtp.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("smtp.use_tls", "not_a_bool").is_err());
        assert!(cfg.set_value("smtp.port", "many").is_err());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.daily.new_count, 3);
    }

    #[test]
    fn read_from_missing_file_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");

        assert!(Config::read_from(&path).unwrap().is_none());
        assert!(!path.exists());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn read_from_returns_existing_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[daily]\nnew_count = 7\n").unwrap();

        let cfg = Config::read_from(&path).unwrap().unwrap();
        assert_eq!(cfg.daily.new_count, 7);
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[smtp\nport = ").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.smtp.to = "me@example.com".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.smtp.to, "me@example.com");
    }

    #[test]
    fn ensure_addresses_requires_both() {
        let mut smtp = SmtpConfig::default();
        assert!(matches!(
            smtp.ensure_addresses(),
            Err(ConfigError::MissingKey(k)) if k == "smtp.from"
        ));
        smtp.from = "a@example.com".into();
        smtp.to = "b@example.com".into();
        assert!(smtp.ensure_addresses().is_ok());
    }
}
