//! Motion state machine
//!
//! Consumes layer text line by line and appends positions, moves and samples
//! to the model under construction.

use super::context::MotionContext;
use crate::gcode::{
    classify_line, ArcConfig, ArcStart, ArcTessellator, LineKind, LineType, MotionCode,
    MotionCommand, PrintInfo, LAYER_MARKER,
};
use crate::model::aggregate;
use crate::model::samples::commit_sample;
use crate::model::{GcodeModel, LayerGeometry, Move};
use gcodeview_core::{ValueRange, Vec3};
use gcodeview_settings::ReconstructConfig;
use tracing::{trace, warn};

/// Builds a [`GcodeModel`] one layer at a time
#[derive(Debug)]
pub struct ModelBuilder {
    ctx: MotionContext,
    model: GcodeModel,
    tessellator: ArcTessellator,
    cross_section: f32,
    width_epsilon: f32,
    layer_height_bias: f32,
    /// Cleared for good on the first missing or unparsable layer marker
    layer_numbers_ok: bool,
    /// Non-empty lines per processed layer
    line_counts: Vec<usize>,
    /// Last `;TIME_ELAPSED:` seen in the current layer
    layer_elapsed: Option<f32>,
    /// Running total at the end of the last layer that reported one
    elapsed_total: f32,
    speed: Option<ValueRange>,
    flow: Option<ValueRange>,
    volumetric_flow: Option<ValueRange>,
}

impl ModelBuilder {
    pub fn new(config: &ReconstructConfig, print_info: PrintInfo) -> Self {
        let mode = config.extrusion_mode.unwrap_or(print_info.extrusion_mode);
        let ctx = MotionContext::new(mode.is_relative(), print_info.initial_state);

        let mut model = GcodeModel {
            positions: vec![Vec3::ZERO],
            print_info,
            ..Default::default()
        };
        model.base_info.nozzle_count = 1;

        Self {
            ctx,
            model,
            tessellator: ArcTessellator::new(ArcConfig::from(config)),
            cross_section: config.cross_section_area(),
            width_epsilon: config.width_epsilon,
            layer_height_bias: config.layer_height_bias,
            layer_numbers_ok: true,
            line_counts: Vec::new(),
            layer_elapsed: None,
            elapsed_total: 0.0,
            speed: None,
            flow: None,
            volumetric_flow: None,
        }
    }

    /// Process one layer block; `layer` is its 0-based index
    pub fn process_layer(&mut self, text: &str, layer: usize) {
        let first_move = self.model.moves.len();
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .peekable();

        if self.layer_numbers_ok {
            match lines.peek().and_then(|first| parse_layer_number(first)) {
                Some(number) => self.model.base_info.layer_numbers.push(number),
                None => {
                    warn!("Layer {} has no parsable {} marker, using a single layer", layer, LAYER_MARKER);
                    self.layer_numbers_ok = false;
                }
            }
        }

        self.layer_elapsed = None;
        let mut step_map = Vec::new();
        let mut ordinal = 0;
        for line in lines {
            self.process_line(line, ordinal, &mut step_map);
            ordinal += 1;
        }

        if let Some(elapsed) = self.layer_elapsed {
            self.model
                .base_info
                .layer_times
                .insert(layer, elapsed - self.elapsed_total);
            self.elapsed_total = elapsed;
        }

        self.line_counts.push(ordinal);
        self.model
            .base_info
            .steps
            .push(self.model.moves.len() - first_move);
        self.model.step_index_maps.push(step_map);
    }

    fn process_line(&mut self, line: &str, ordinal: usize, step_map: &mut Vec<usize>) {
        let classified = classify_line(line);
        if let Some(line_type) = classified.type_marker {
            self.ctx.line_type = line_type;
        }

        match classified.kind {
            LineKind::Motion(command) if command.code.is_arc() => {
                let start = ArcStart {
                    position: self.ctx.position,
                    extrusion: self.ctx.extrusion,
                    relative: self.ctx.relative_extrusion,
                };
                for segment in self.tessellator.tessellate(&command, &start) {
                    self.process_linear(&segment, ordinal, step_map);
                }
            }
            LineKind::Motion(command) => self.process_linear(&command, ordinal, step_map),
            LineKind::ToolChange(extruder) => {
                self.ctx.extruder = extruder;
                let nozzles = &mut self.model.base_info.nozzle_count;
                *nozzles = (*nozzles).max(extruder + 1);
            }
            LineKind::Thermal(command) => self.ctx.thermal.apply(command),
            LineKind::TimeElapsed(seconds) => self.layer_elapsed = Some(seconds),
            LineKind::ResetExtrusion(value) => self.ctx.extrusion = value,
            LineKind::Other => {}
        }
    }

    fn process_linear(&mut self, command: &MotionCommand, ordinal: usize, step_map: &mut Vec<usize>) {
        if let Some(feed_rate) = command.f {
            self.ctx.feed_rate = feed_rate;
        }

        let current = self.ctx.position;
        let target = self.ctx.resolve_position(command.x, command.y, command.z);
        let target_e = self.ctx.resolve_extrusion(command.extrusion_word());
        let position_changed = command.has_axis_word() && target != current;

        let mut line_type = self.ctx.line_type;
        if target_e == self.ctx.extrusion {
            if command.code == MotionCode::Rapid || position_changed {
                line_type = LineType::Travel;
            }
        } else if target_e < self.ctx.extrusion {
            if position_changed {
                line_type = LineType::Travel;
            } else {
                let index = self.model.positions.len() - 1;
                trace!("Retraction at position {}", index);
                self.model.retractions.push(index);
            }
        }

        if position_changed {
            let delta = target_e - self.ctx.extrusion;
            self.append_move(current, target, delta, line_type, ordinal, step_map);
        }

        self.ctx.position = target;
        self.ctx.extrusion = target_e;
    }

    fn append_move(
        &mut self,
        current: Vec3,
        target: Vec3,
        delta: f32,
        line_type: LineType,
        ordinal: usize,
        step_map: &mut Vec<usize>,
    ) {
        let start = self.model.positions.len() - 1;
        self.model.positions.push(target);

        if delta > 0.0
            && line_type == LineType::OuterWall
            && self
                .model
                .moves
                .last()
                .is_some_and(|prev| prev.line_type == LineType::Travel)
        {
            self.model.seams.push(start);
        }

        if target.z != current.z {
            let height = (target.z - current.z).abs() + self.layer_height_bias;
            self.ctx.layer_height = height;
            self.ctx.geometry.layer_height = height;
            self.ctx.layer_height_changed = true;
        }
        if delta > 0.0 {
            self.flow = ValueRange::include(self.flow, delta);
            self.update_geometry(current, target, delta);
        }

        let mv = Move {
            start,
            speed: self.ctx.feed_rate,
            extrusion_delta: delta,
            line_type,
            extruder: self.ctx.extruder,
            temperature: commit_sample(&mut self.model.temperatures, self.ctx.thermal.temperature),
            fan: commit_sample(&mut self.model.fans, self.ctx.thermal.fan),
            geometry: commit_sample(&mut self.model.layer_geometries, self.ctx.geometry),
        };
        self.model.moves.push(mv);
        step_map.push(ordinal);
        self.model.base_info.bounds.update(target);

        if line_type != LineType::Travel {
            self.speed = ValueRange::include(self.speed, self.ctx.feed_rate);
        }
    }

    fn update_geometry(&mut self, current: Vec3, target: Vec3, delta: f32) {
        let length = current.planar_distance(&target);
        let height = self.ctx.layer_height;
        let volume = delta * self.cross_section;

        let width = if length > 0.0 && height > 0.0 {
            volume / length / height
        } else {
            0.0
        };
        let flow = if length > 0.0 && self.ctx.feed_rate > 0.0 {
            volume / (length / (self.ctx.feed_rate / 60.0))
        } else {
            0.0
        };
        if flow > 0.0 {
            self.volumetric_flow = ValueRange::include(self.volumetric_flow, flow);
        }

        if self.ctx.layer_height_changed || (width - self.ctx.geometry.width).abs() > self.width_epsilon {
            self.ctx.geometry = LayerGeometry {
                layer_height: height,
                width,
                flow,
            };
            self.ctx.layer_height_changed = false;
        }
    }

    /// Finish the model. `interrupted` forces the single-layer fallback.
    pub fn finish(mut self, interrupted: bool) -> GcodeModel {
        let info = &mut self.model.base_info;
        info.total_steps = self.model.moves.len();
        info.layers = info.layer_numbers.len();
        info.speed = self.speed;
        info.flow = self.flow;
        info.volumetric_flow = self.volumetric_flow;

        if interrupted || !self.layer_numbers_ok {
            aggregate::collapse_layers(info, &mut self.model.step_index_maps, &self.line_counts);
        }

        aggregate::normalize_speeds(&mut self.model.moves, self.speed);
        aggregate::summarize_samples(&mut self.model);
        self.model
    }
}

/// Layer number from a `;LAYER:<n>` line
fn parse_layer_number(line: &str) -> Option<i32> {
    line.strip_prefix(LAYER_MARKER)?.trim().parse::<i32>().ok()
}
