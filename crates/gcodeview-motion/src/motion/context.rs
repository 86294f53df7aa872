//! Sticky parser state carried across lines and layers.

use crate::gcode::LineType;
use crate::model::{LayerGeometry, ThermalState};
use gcodeview_core::Vec3;

/// Everything a G-code line can change that later lines depend on
#[derive(Debug, Clone, PartialEq)]
pub struct MotionContext {
    pub position: Vec3,
    /// Extrusion axis value
    pub extrusion: f32,
    /// Last `F` word (mm/min)
    pub feed_rate: f32,
    pub line_type: LineType,
    pub extruder: usize,
    pub relative_extrusion: bool,
    /// Thermal and fan targets committed on the next move
    pub thermal: ThermalState,
    pub layer_height: f32,
    /// Set on Z change, cleared when the next geometry sample is taken
    pub layer_height_changed: bool,
    /// Geometry committed on the next move
    pub geometry: LayerGeometry,
}

impl MotionContext {
    pub fn new(relative_extrusion: bool, thermal: ThermalState) -> Self {
        Self {
            position: Vec3::ZERO,
            extrusion: 0.0,
            feed_rate: 0.0,
            line_type: LineType::None,
            extruder: 0,
            relative_extrusion,
            thermal,
            layer_height: 0.0,
            layer_height_changed: false,
            geometry: LayerGeometry::default(),
        }
    }

    /// Resolve an extrusion word against the current axis value
    pub fn resolve_extrusion(&self, word: Option<f32>) -> f32 {
        match word {
            Some(e) if self.relative_extrusion => self.extrusion + e,
            Some(e) => e,
            None => self.extrusion,
        }
    }

    /// Resolve axis words against the current position
    pub fn resolve_position(&self, x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Vec3 {
        Vec3::new(
            x.unwrap_or(self.position.x),
            y.unwrap_or(self.position.y),
            z.unwrap_or(self.position.z),
        )
    }
}
