//! GCodeView Settings Crate
//!
//! Handles reconstruction configuration: defaults, validation and JSON/TOML
//! persistence.

pub mod config;
pub mod error;

pub use config::{default_config_path, ExtrusionMode, ReconstructConfig, CONFIG_FILE_NAME};
pub use error::{ConfigError, SettingsError, SettingsResult};
