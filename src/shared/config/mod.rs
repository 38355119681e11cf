//! Application configuration module
//!
//! Configuration for the thread store client: where the local database
//! lives, how much action history to keep for diagnostics, which action
//! fields count as secrets, and the platform details stamped on reports.
//!
//! Values come from the builder defaults, optionally a TOML file, and finally
//! environment overrides (`THREADSYNC_DB_PATH`,
//! `THREADSYNC_ACTION_LOG_CAPACITY`).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::shared::report::PlatformDetails;

/// Default number of action summaries kept for inconsistency reports
pub const DEFAULT_ACTION_LOG_CAPACITY: usize = 50;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "THREADSYNC_DB_PATH";

/// Environment variable overriding the action log capacity
pub const ACTION_LOG_CAPACITY_ENV: &str = "THREADSYNC_ACTION_LOG_CAPACITY";

/// Keys redacted from actions embedded in reports
pub const DEFAULT_REDACTED_KEYS: &[&str] = &["cookie", "password", "deviceToken", "sessionID"];

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Local database file; `None` uses the platform data directory
    pub database_path: Option<PathBuf>,
    /// Number of action summaries kept in history
    pub action_log_capacity: usize,
    /// Action types never recorded in history
    pub uninteresting_actions: Vec<String>,
    /// Object keys whose values are masked when sanitizing actions
    pub redacted_keys: Vec<String>,
    pub platform_details: PlatformDetails,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            action_log_capacity: DEFAULT_ACTION_LOG_CAPACITY,
            uninteresting_actions: Vec::new(),
            redacted_keys: DEFAULT_REDACTED_KEYS.iter().map(|key| key.to_string()).collect(),
            platform_details: PlatformDetails::default(),
        }
    }
}

/// On-disk shape of the configuration file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    action_log_capacity: Option<usize>,
    uninteresting_actions: Option<Vec<String>>,
    redacted_keys: Option<Vec<String>>,
    platform_details: Option<PlatformDetails>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Parse configuration from TOML text, filling gaps with defaults
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        let mut builder = AppConfig::builder();
        if let Some(path) = file.database_path {
            builder = builder.database_path(path);
        }
        if let Some(capacity) = file.action_log_capacity {
            builder = builder.action_log_capacity(capacity);
        }
        if let Some(actions) = file.uninteresting_actions {
            builder = builder.uninteresting_actions(actions);
        }
        if let Some(keys) = file.redacted_keys {
            builder = builder.redacted_keys(keys);
        }
        if let Some(platform_details) = file.platform_details {
            builder = builder.platform_details(platform_details);
        }
        builder.build()
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        config.with_env_overrides()
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `THREADSYNC_*` environment overrides
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.is_empty() {
                self.database_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(capacity) = std::env::var(ACTION_LOG_CAPACITY_ENV) {
            self.action_log_capacity = capacity.trim().parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: "action_log_capacity",
                    message: format!("not a number: {}", capacity),
                }
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.action_log_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "action_log_capacity",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.platform_details.platform.is_empty() {
            return Err(ConfigError::MissingValue("platform_details.platform"));
        }
        Ok(())
    }

    /// Database file path, falling back to the platform data directory
    pub fn resolved_database_path(&self) -> PathBuf {
        match &self.database_path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                path.push("threadsync");
                path.push("threads.db");
                path
            }
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_path: Option<PathBuf>,
    action_log_capacity: Option<usize>,
    uninteresting_actions: Option<Vec<String>>,
    redacted_keys: Option<Vec<String>>,
    platform_details: Option<PlatformDetails>,
}

impl AppConfigBuilder {
    /// Set the local database path
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the action history capacity
    pub fn action_log_capacity(mut self, capacity: usize) -> Self {
        self.action_log_capacity = Some(capacity);
        self
    }

    pub fn uninteresting_actions(mut self, actions: Vec<String>) -> Self {
        self.uninteresting_actions = Some(actions);
        self
    }

    pub fn redacted_keys(mut self, keys: Vec<String>) -> Self {
        self.redacted_keys = Some(keys);
        self
    }

    pub fn platform_details(mut self, platform_details: PlatformDetails) -> Self {
        self.platform_details = Some(platform_details);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_path: self.database_path.or(defaults.database_path),
            action_log_capacity: self
                .action_log_capacity
                .unwrap_or(defaults.action_log_capacity),
            uninteresting_actions: self
                .uninteresting_actions
                .unwrap_or(defaults.uninteresting_actions),
            redacted_keys: self.redacted_keys.unwrap_or(defaults.redacted_keys),
            platform_details: self.platform_details.unwrap_or(defaults.platform_details),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
