//! Errors raised while loading, saving or validating a reconstruction config.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value parsed but makes no sense for reconstruction.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("No platform config directory")]
    NoConfigDirectory,

    #[error("Malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot encode TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Problems with the shape of a config rather than a single value's meaning
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` are understood.
    #[error("Unsupported config format '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },
}

impl SettingsError {
    pub fn invalid(key: &str, reason: &str) -> Self {
        SettingsError::InvalidSetting {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The config file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, SettingsError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

impl From<SettingsError> for gcodeview_core::Error {
    fn from(err: SettingsError) -> Self {
        gcodeview_core::Error::config(err.to_string())
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
