//! G-code text handling
//!
//! Line classification, arc tessellation, layer segmentation and preamble
//! metadata.

pub mod arc;
pub mod layers;
pub mod line_type;
pub mod preamble;
pub mod tokenizer;

pub use arc::{ArcConfig, ArcStart, ArcTessellator};
pub use layers::{SlicedGcode, END_MARKER, LAYER_MARKER};
pub use line_type::LineType;
pub use preamble::{scan_preamble, BeltType, PrintInfo};
pub use tokenizer::{
    classify_line, ClassifiedLine, FanSlot, Heater, LineKind, MotionCode, MotionCommand,
    ThermalCommand,
};
