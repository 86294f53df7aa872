//! Error handling for GCodeView
//!
//! Provides error types for all layers of the workspace:
//! - G-Code errors (reconstruction, layer bookkeeping, input files)
//! - Configuration errors surfaced by the settings crate
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors related to G-Code reconstruction and input handling.
/// Malformed tokens and unknown commands are recovered locally by the
/// reconstructor and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Reconstruction was cancelled through the progress handle
    #[error("Reconstruction interrupted after layer {layers_done} of {layers_total}: {message}")]
    Interrupted {
        /// Number of layers fully processed before stopping.
        layers_done: usize,
        /// Number of layers handed to the reconstructor.
        layers_total: usize,
        /// The failure message reported to the progress handle.
        message: String,
    },

    /// A layer index outside of the reconstructed model was requested
    #[error("Layer {layer} out of range (layers: {layers})")]
    LayerOutOfRange {
        /// The requested layer.
        layer: usize,
        /// The number of layers in the model.
        layers: usize,
    },

    /// Input file could not be used
    #[error("File error: {reason}")]
    FileError {
        /// The reason for the file error.
        reason: String,
    },
}

/// Main error type for GCodeView
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error from a string message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this error reports a cancelled reconstruction
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Gcode(GcodeError::Interrupted { .. }))
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_display() {
        let err = GcodeError::Interrupted {
            layers_done: 3,
            layers_total: 10,
            message: "cancelled by user".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Reconstruction interrupted after layer 3 of 10: cancelled by user"
        );
    }

    #[test]
    fn test_error_classification() {
        let err: Error = GcodeError::Interrupted {
            layers_done: 1,
            layers_total: 2,
            message: String::new(),
        }
        .into();
        assert!(err.is_interrupted());
        assert!(err.is_gcode_error());

        let err: Error = GcodeError::LayerOutOfRange {
            layer: 5,
            layers: 2,
        }
        .into();
        assert!(!err.is_interrupted());
        assert_eq!(err.to_string(), "Layer 5 out of range (layers: 2)");

        let err = Error::config("filament diameter must be > 0");
        assert!(!err.is_gcode_error());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.gcode");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
