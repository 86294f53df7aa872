//! Error types for motion reconstruction.

use crate::model::GcodeModel;
use gcodeview_core::GcodeError;
use gcodeview_settings::SettingsError;
use thiserror::Error;

/// Errors returned by [`crate::GcodeReconstructor`]
#[derive(Error, Debug)]
pub enum ReconstructError {
    /// The tracer asked to stop. The partial model covers the processed
    /// layers only and is collapsed to a single layer; it is not valid data.
    #[error("Reconstruction interrupted after layer {layers_done} of {layers_total}: {message}")]
    Interrupted {
        layers_done: usize,
        layers_total: usize,
        message: String,
        partial: Box<GcodeModel>,
    },

    /// The reconstruction config failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl ReconstructError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ReconstructError::Interrupted { .. })
    }

    /// Model built before the interruption
    pub fn partial(&self) -> Option<&GcodeModel> {
        match self {
            ReconstructError::Interrupted { partial, .. } => Some(partial.as_ref()),
            ReconstructError::Settings(_) => None,
        }
    }

    pub fn into_partial(self) -> Option<GcodeModel> {
        match self {
            ReconstructError::Interrupted { partial, .. } => Some(*partial),
            ReconstructError::Settings(_) => None,
        }
    }
}

impl From<ReconstructError> for gcodeview_core::Error {
    fn from(err: ReconstructError) -> Self {
        match err {
            ReconstructError::Interrupted {
                layers_done,
                layers_total,
                message,
                ..
            } => GcodeError::Interrupted {
                layers_done,
                layers_total,
                message,
            }
            .into(),
            ReconstructError::Settings(err) => err.into(),
        }
    }
}
