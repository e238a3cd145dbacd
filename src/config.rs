//! Configuration for the `maya` binary.
//!
//! Values come from defaults, then an optional TOML file, then `MAYA_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Browser local storage typically allows about 5 MiB per origin
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "maya.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file standing in for the browser's local storage
    pub path: PathBuf,
    /// Byte budget for keys plus values
    pub quota_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "maya_listings=debug"
    pub level: String,
    pub with_target: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("maya_storage.json"),
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl AppConfig {
    /// Load from `path` (or `maya.toml` if it exists), apply env overrides, validate
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from `MAYA_STORAGE_PATH`, `MAYA_STORAGE_QUOTA` and `MAYA_LOG`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MAYA_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(quota) = lookup("MAYA_STORAGE_QUOTA") {
            self.storage.quota_bytes =
                quota.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MAYA_STORAGE_QUOTA".to_string(),
                    value: quota.clone(),
                })?;
        }
        if let Some(level) = lookup("MAYA_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "storage.path must not be empty".to_string(),
            ));
        }
        if self.storage.quota_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "storage.quota_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
