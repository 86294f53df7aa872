//! Reconstruction configuration
//!
//! Parameters that steer the motion reconstructor. Files are JSON or TOML,
//! chosen by extension.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name used under the platform config directory
pub const CONFIG_FILE_NAME: &str = "reconstruct.toml";

/// How `E` words are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtrusionMode {
    /// `E` is the absolute filament position (`M82`)
    #[default]
    Absolute,
    /// `E` is a delta from the current position (`M83`)
    Relative,
}

impl ExtrusionMode {
    pub fn is_relative(&self) -> bool {
        matches!(self, ExtrusionMode::Relative)
    }
}

/// Reconstruction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructConfig {
    /// Forces the extrusion mode; `None` uses what the file preamble declares
    pub extrusion_mode: Option<ExtrusionMode>,
    /// Filament diameter in mm
    pub filament_diameter: f32,
    /// Angular step used to tessellate arcs, in degrees
    pub arc_resolution_deg: f32,
    /// Minimum width change (mm) that starts a new geometry sample
    pub width_epsilon: f32,
    /// Added to every computed layer height (mm)
    pub layer_height_bias: f32,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            extrusion_mode: None,
            filament_diameter: 1.75,
            arc_resolution_deg: 5.0,
            width_epsilon: 0.01,
            layer_height_bias: 1e-4,
        }
    }
}

impl ReconstructConfig {
    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded reconstruction config");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Load `path` if given, otherwise the default config file when it
    /// exists, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        positive("filament_diameter", self.filament_diameter)?;
        positive("arc_resolution_deg", self.arc_resolution_deg)?;

        if self.arc_resolution_deg > 360.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "arc_resolution_deg".to_string(),
                value: self.arc_resolution_deg.to_string(),
            }
            .into());
        }

        if self.width_epsilon.is_nan() || self.width_epsilon < 0.0 {
            return Err(SettingsError::invalid("width_epsilon", "must be >= 0"));
        }

        if self.layer_height_bias.is_nan() || self.layer_height_bias < 0.0 {
            return Err(SettingsError::invalid("layer_height_bias", "must be >= 0"));
        }

        Ok(())
    }

    /// Filament cross-section area in mm²
    pub fn cross_section_area(&self) -> f32 {
        let radius = self.filament_diameter / 2.0;
        PI * radius * radius
    }

    /// Arc resolution in radians
    pub fn arc_resolution_rad(&self) -> f32 {
        self.arc_resolution_deg.to_radians()
    }
}

fn positive(key: &str, value: f32) -> SettingsResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be > 0"))
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
        }
    }
}

/// Location of the user's reconstruction config file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDirectory)?;
    Ok(dir.join("gcodeview").join(CONFIG_FILE_NAME))
}
