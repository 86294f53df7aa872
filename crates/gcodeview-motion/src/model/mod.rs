//! Reconstructed motion model.
//!
//! Produced by [`crate::GcodeReconstructor`] and handed to callers as a
//! read-only value.

pub mod aggregate;
pub mod legend;
pub mod samples;

pub use legend::{speed_legend, type_legend, SpeedLegendEntry, TypeLegendEntry};
pub use samples::{Fan, LayerGeometry, Temperature, ThermalState};

use crate::gcode::{LineType, PrintInfo};
use gcodeview_core::{Bounds3, GcodeError, ValueRange, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// One straight tool motion from `positions[start]` to `positions[start + 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub start: usize,
    /// Raw feed rate while building, normalized to `[0, 1]` afterwards
    pub speed: f32,
    /// Signed filament delta over the move
    pub extrusion_delta: f32,
    pub line_type: LineType,
    pub extruder: usize,
    /// Index into [`GcodeModel::temperatures`]
    pub temperature: usize,
    /// Index into [`GcodeModel::fans`]
    pub fan: usize,
    /// Index into [`GcodeModel::layer_geometries`]
    pub geometry: usize,
}

impl Move {
    pub fn end(&self) -> usize {
        self.start + 1
    }

    pub fn is_extruding(&self) -> bool {
        self.extrusion_delta > 0.0
    }
}

/// Summary statistics.
///
/// Ranges are `None` when nothing contributed to them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseInfo {
    pub total_steps: usize,
    pub layers: usize,
    /// Moves per layer
    pub steps: Vec<usize>,
    /// Numbers parsed from `;LAYER:` markers
    pub layer_numbers: Vec<i32>,
    pub bounds: Bounds3,
    pub nozzle_count: usize,
    /// Raw feed rate range over non-travel moves (mm/min)
    pub speed: Option<ValueRange>,
    /// Range of positive extrusion deltas
    pub flow: Option<ValueRange>,
    /// Volumetric flow range over extruding moves with a feed rate (mm³/s)
    pub volumetric_flow: Option<ValueRange>,
    /// Range of per-layer print times (s)
    pub layer_time: Option<ValueRange>,
    pub line_width: Option<ValueRange>,
    pub layer_height: Option<ValueRange>,
    /// Nozzle temperature range
    pub temperature: Option<ValueRange>,
    /// Print time per layer, only for layers with a `;TIME_ELAPSED:` marker
    pub layer_times: BTreeMap<usize, f32>,
}

/// The reconstructed model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GcodeModel {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) moves: Vec<Move>,
    pub(crate) temperatures: Vec<Temperature>,
    pub(crate) fans: Vec<Fan>,
    pub(crate) layer_geometries: Vec<LayerGeometry>,
    pub(crate) seams: Vec<usize>,
    pub(crate) retractions: Vec<usize>,
    pub(crate) step_index_maps: Vec<Vec<usize>>,
    pub(crate) base_info: BaseInfo,
    pub(crate) print_info: PrintInfo,
}

impl GcodeModel {
    /// All positions; index 0 is the origin
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn temperatures(&self) -> &[Temperature] {
        &self.temperatures
    }

    pub fn fans(&self) -> &[Fan] {
        &self.fans
    }

    pub fn layer_geometries(&self) -> &[LayerGeometry] {
        &self.layer_geometries
    }

    /// Position indices where an outer wall starts after a travel
    pub fn seams(&self) -> &[usize] {
        &self.seams
    }

    /// Position indices where the filament was pulled back in place
    pub fn retractions(&self) -> &[usize] {
        &self.retractions
    }

    /// Per layer, move ordinal -> non-empty source line ordinal
    pub fn step_index_maps(&self) -> &[Vec<usize>] {
        &self.step_index_maps
    }

    pub fn base_info(&self) -> &BaseInfo {
        &self.base_info
    }

    pub fn print_info(&self) -> &PrintInfo {
        &self.print_info
    }

    /// Serialize the whole model
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn layers(&self) -> usize {
        self.base_info.layers
    }

    pub fn total_steps(&self) -> usize {
        self.base_info.total_steps
    }

    /// Moves in `layer`
    pub fn steps(&self, layer: usize) -> Option<usize> {
        self.base_info.steps.get(layer).copied()
    }

    /// Range of move indices belonging to `layer`
    pub fn layer_move_range(&self, layer: usize) -> Option<Range<usize>> {
        let steps = self.steps(layer)?;
        let start: usize = self.base_info.steps[..layer].iter().sum();
        Some(start..start + steps)
    }

    /// Moves belonging to `layer`
    pub fn layer_moves(&self, layer: usize) -> Result<&[Move], GcodeError> {
        let range = self
            .layer_move_range(layer)
            .ok_or(GcodeError::LayerOutOfRange {
                layer,
                layers: self.layers(),
            })?;
        Ok(&self.moves[range])
    }

    pub fn move_at(&self, layer: usize, step: usize) -> Option<&Move> {
        let range = self.layer_move_range(layer)?;
        if step >= range.len() {
            return None;
        }
        self.moves.get(range.start + step)
    }

    /// Normalized speed of a move
    pub fn trait_speed(&self, layer: usize, step: usize) -> Option<f32> {
        self.move_at(layer, step).map(|m| m.speed)
    }

    /// Position reached by a move
    pub fn trait_position(&self, layer: usize, step: usize) -> Option<Vec3> {
        let mv = self.move_at(layer, step)?;
        self.positions.get(mv.end()).copied()
    }

    /// Non-empty line ordinal in the layer text that emitted a move
    pub fn source_line_for_step(&self, layer: usize, step: usize) -> Option<usize> {
        self.step_index_maps.get(layer)?.get(step).copied()
    }

    /// Last move emitted at or before a source line ordinal
    pub fn step_for_source_line(&self, layer: usize, line: usize) -> Option<usize> {
        let map = self.step_index_maps.get(layer)?;
        let count = map.partition_point(|&ordinal| ordinal <= line);
        count.checked_sub(1)
    }

    pub fn temperature_of(&self, mv: &Move) -> Option<&Temperature> {
        self.temperatures.get(mv.temperature)
    }

    pub fn fan_of(&self, mv: &Move) -> Option<&Fan> {
        self.fans.get(mv.fan)
    }

    pub fn layer_geometry_of(&self, mv: &Move) -> Option<&LayerGeometry> {
        self.layer_geometries.get(mv.geometry)
    }

    pub fn move_endpoints(&self, mv: &Move) -> Option<(Vec3, Vec3)> {
        Some((*self.positions.get(mv.start)?, *self.positions.get(mv.end())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(start: usize) -> Move {
        Move {
            start,
            speed: 0.5,
            extrusion_delta: 1.0,
            line_type: LineType::OuterWall,
            extruder: 0,
            temperature: 0,
            fan: 0,
            geometry: 0,
        }
    }

    fn two_layer_model() -> GcodeModel {
        GcodeModel {
            positions: (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.2)).collect(),
            moves: (0..4).map(mv).collect(),
            temperatures: vec![Temperature::default()],
            fans: vec![Fan::default()],
            layer_geometries: vec![LayerGeometry::default()],
            step_index_maps: vec![vec![1, 3], vec![2, 5]],
            base_info: BaseInfo {
                total_steps: 4,
                layers: 2,
                steps: vec![2, 2],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_layer_move_range() {
        let model = two_layer_model();
        assert_eq!(model.layer_move_range(0), Some(0..2));
        assert_eq!(model.layer_move_range(1), Some(2..4));
        assert_eq!(model.layer_move_range(2), None);
        assert_eq!(model.layer_moves(1).unwrap().len(), 2);
        assert_eq!(
            model.layer_moves(5),
            Err(GcodeError::LayerOutOfRange { layer: 5, layers: 2 })
        );
    }

    #[test]
    fn test_move_lookup() {
        let model = two_layer_model();
        assert_eq!(model.move_at(1, 0).map(|m| m.start), Some(2));
        assert!(model.move_at(0, 2).is_none());
        assert_eq!(model.trait_position(1, 1), Some(Vec3::new(4.0, 0.0, 0.2)));
        assert_eq!(model.trait_speed(0, 0), Some(0.5));
    }

    #[test]
    fn test_source_line_lookup() {
        let model = two_layer_model();
        assert_eq!(model.source_line_for_step(0, 1), Some(3));
        assert_eq!(model.step_for_source_line(0, 0), None);
        assert_eq!(model.step_for_source_line(0, 1), Some(0));
        assert_eq!(model.step_for_source_line(0, 2), Some(0));
        assert_eq!(model.step_for_source_line(0, 10), Some(1));
        assert_eq!(model.step_for_source_line(3, 0), None);
    }

    #[test]
    fn test_sample_lookup() {
        let model = two_layer_model();
        let first = model.moves()[0];
        assert!(model.temperature_of(&first).is_some());
        assert!(model.fan_of(&first).is_some());
        assert!(model.layer_geometry_of(&first).is_some());
        assert_eq!(
            model.move_endpoints(&first),
            Some((Vec3::new(0.0, 0.0, 0.2), Vec3::new(1.0, 0.0, 0.2)))
        );
    }

    #[test]
    fn test_json_round_trip_keeps_layer_times() {
        let mut model = GcodeModel::default();
        model.positions.push(Vec3::new(1.0, 2.0, 0.2));
        model.base_info.layer_times.insert(3, 7.5);
        let json = model.to_json(false).unwrap();
        assert!(json.contains("\"layer_times\":{\"3\":7.5}"));
        assert_eq!(GcodeModel::from_json(&json).unwrap(), model);
    }
}
