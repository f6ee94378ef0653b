//! Configuration for assetio hosts
//!
//! Selects the default manager and its settings, and configures logging.
//!
//! # Configuration Hierarchy
//!
//! Settings are resolved in the following order of precedence (highest to
//! lowest):
//! 1. **Environment variables**: `ASSETIO__*`, with `__` separating nested
//!    keys (e.g. `ASSETIO__LOGGING__LEVEL=debug`)
//! 2. **Configuration file**: the TOML file named by `ASSETIO_DEFAULT_CONFIG`,
//!    else `assetio.toml` in the working directory if it exists
//! 3. **Default values**
//!
//! # Configuration File Example
//!
//! ```toml
//! [manager]
//! identifier = "org.example.manager"
//!
//! [manager.settings]
//! library_path = "${config_dir}/library.json"
//! read_only = true
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! String manager settings may contain `${config_dir}`, which is replaced
//! with the directory holding the configuration file.

pub mod logging;

use assetio_manager_api::{InfoDictionary, PropertyValue};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ASSETIO_DEFAULT_CONFIG";

/// File looked up in the working directory when `ASSETIO_DEFAULT_CONFIG` is
/// not set
pub const DEFAULT_CONFIG_FILE: &str = "assetio.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "ASSETIO__";

/// Placeholder in string settings replaced with the config file's directory
pub const CONFIG_DIR_PLACEHOLDER: &str = "${config_dir}";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Manager selected by default, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Default manager selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Identifier of the manager to use
    pub identifier: String,
    /// Settings passed to the manager's `initialize`
    #[serde(default)]
    pub settings: InfoDictionary,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Figment error: {0}")]
    Figment(#[from] figment::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to write configuration file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for figment::Error {
    fn from(err: ConfigError) -> figment::Error {
        use figment::error::Kind;
        figment::Error::from(Kind::Message(err.to_string()))
    }
}

impl AppConfig {
    /// Load configuration from the environment and the default config file.
    ///
    /// A path given in `ASSETIO_DEFAULT_CONFIG` must exist; `assetio.toml` is
    /// only used if present.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::load_from_path(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                Self::load_with_file(path.exists().then_some(path))
            }
        }
    }

    /// Load configuration from a specific TOML file, still applying
    /// environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load_with_file(Some(path))
    }

    fn load_with_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading TOML configuration");
            figment = figment.merge(Toml::file(path));
        }

        let mut config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        if let (Some(manager), Some(dir)) = (&mut config.manager, path.and_then(config_file_dir)) {
            manager.expand_config_dir(&dir);
        }

        config.validate()?;

        debug!(
            manager = ?config.manager.as_ref().map(|m| m.identifier.as_str()),
            log_level = %config.logging.level,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(manager) = &self.manager {
            if manager.identifier.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "Manager identifier cannot be empty".to_string(),
                ));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration as TOML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, self.to_toml_string()?).map_err(write_error)
    }
}

impl ManagerConfig {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            settings: InfoDictionary::new(),
        }
    }

    fn expand_config_dir(&mut self, config_dir: &Path) {
        let config_dir = config_dir.to_string_lossy();
        for value in self.settings.values_mut() {
            if let PropertyValue::Str(text) = value {
                if text.contains(CONFIG_DIR_PLACEHOLDER) {
                    *text = text.replace(CONFIG_DIR_PLACEHOLDER, &config_dir);
                }
            }
        }
    }
}

/// Absolute directory containing the config file
fn config_file_dir(path: &Path) -> Option<PathBuf> {
    let absolute = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    absolute.parent().map(Path::to_path_buf)
}
