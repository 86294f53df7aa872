//! Auxiliary per-move samples.
//!
//! Each kind lives in its own append-only arena on the model; moves carry an
//! index into every arena. A new sample is appended only when the committed
//! value differs from the last one.

use crate::gcode::tokenizer::{FanSlot, Heater, ThermalCommand};
use serde::{Deserialize, Serialize};

/// Heater targets in °C
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Temperature {
    pub bed: f32,
    pub nozzle: f32,
    pub chamber: f32,
}

/// Fan duty as commanded (`S` 0–255)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fan {
    pub fan_speed: f32,
    pub chamber_speed: f32,
    pub fan_speed_1: f32,
}

/// Extrusion geometry derived from filament usage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerGeometry {
    /// mm
    pub layer_height: f32,
    /// Extruded line width in mm
    pub width: f32,
    /// Volumetric flow in mm³/s
    pub flow: f32,
}

/// Pending thermal and fan state, committed on the next emitted move
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermalState {
    pub temperature: Temperature,
    pub fan: Fan,
}

impl ThermalState {
    pub fn apply(&mut self, command: ThermalCommand) {
        match command {
            ThermalCommand::Temperature { heater, value } => match heater {
                Heater::Nozzle => self.temperature.nozzle = value,
                Heater::Bed => self.temperature.bed = value,
                Heater::Chamber => self.temperature.chamber = value,
            },
            ThermalCommand::Fan { slot, speed } => match slot {
                FanSlot::Primary => self.fan.fan_speed = speed,
                FanSlot::Auxiliary => self.fan.fan_speed_1 = speed,
                FanSlot::Chamber => self.fan.chamber_speed = speed,
            },
        }
    }
}

/// Append `value` unless it equals the last element; returns its index
pub(crate) fn commit_sample<T: PartialEq + Copy>(arena: &mut Vec<T>, value: T) -> usize {
    if arena.last() != Some(&value) {
        arena.push(value);
    }
    arena.len() - 1
}
