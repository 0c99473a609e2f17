//! Configuration management for Scribe.
//!
//! Two layers live here. [`Settings`] resolves the model credentials and
//! sampling parameters from the environment. [`Config`] holds operational
//! knobs (limits, retry schedule, endpoint, logging) loaded from an optional
//! TOML file with defaults for every field.

pub mod settings;
mod types;
mod validate;

pub use settings::Settings;
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Scribe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Retry schedule for the remote call
    pub retry: RetryConfig,

    /// Gemini endpoint settings
    pub gemini: GeminiConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.scribe.scribe/config.toml
    /// - Linux: ~/.config/scribe/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\scribe\config\config.toml
    ///
    /// Falls back to ~/.scribe/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "scribe", "scribe")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".scribe").join("config.toml")
            })
    }

    /// Directory the prompt templates are resolved against (with ~ expansion).
    pub fn prompt_root(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.general.prompt_root);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
