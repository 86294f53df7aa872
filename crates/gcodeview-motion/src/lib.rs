//! # GCodeView Motion
//!
//! Reconstructs an indexable motion model from slicer G-code: line-type
//! classification, arc tessellation, extrusion-derived geometry, thermal and
//! fan state, per-layer timing, seams and retractions.

pub mod error;
pub mod gcode;
pub mod model;
pub mod motion;
pub mod reconstruct;

pub use error::ReconstructError;
pub use gcode::{scan_preamble, BeltType, LineType, PrintInfo, SlicedGcode};
pub use model::{
    speed_legend, type_legend, BaseInfo, Fan, GcodeModel, LayerGeometry, Move, SpeedLegendEntry,
    Temperature, TypeLegendEntry,
};
pub use reconstruct::GcodeReconstructor;
