//! Arc tessellator
//!
//! Converts G2/G3 arcs into straight G0/G1 segments that flow through the same
//! path as ordinary linear moves.

use super::tokenizer::{MotionCode, MotionCommand};
use gcodeview_core::Vec3;
use gcodeview_settings::ReconstructConfig;
use std::f32::consts::TAU;
use tracing::trace;

/// Slack so a step landing on the sweep end does not duplicate the target
const ANGLE_EPSILON: f32 = 1e-4;

/// Arc tessellation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcConfig {
    /// Angular step between intermediate points, in radians
    pub resolution: f32,
    /// Endpoints closer than this are treated as a full circle
    pub closure_tolerance: f32,
}

impl Default for ArcConfig {
    fn default() -> Self {
        Self {
            resolution: 5f32.to_radians(),
            closure_tolerance: 1e-4,
        }
    }
}

impl From<&ReconstructConfig> for ArcConfig {
    fn from(config: &ReconstructConfig) -> Self {
        Self {
            resolution: config.arc_resolution_rad(),
            ..Default::default()
        }
    }
}

/// Where the tool is when an arc starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStart {
    pub position: Vec3,
    /// Current extrusion axis value
    pub extrusion: f32,
    pub relative: bool,
}

/// Converts arc commands to line segments
#[derive(Debug, Clone, Default)]
pub struct ArcTessellator {
    config: ArcConfig,
}

impl ArcTessellator {
    pub fn new(config: ArcConfig) -> Self {
        Self { config }
    }

    /// Counter-clockwise-positive sweep in `[0, 2π]`
    pub fn sweep(&self, start: Vec3, end: Vec3, center: Vec3, clockwise: bool, full_circle: bool) -> f32 {
        if full_circle {
            return TAU;
        }
        let start_angle = (start.y - center.y).atan2(start.x - center.x);
        let end_angle = (end.y - center.y).atan2(end.x - center.x);
        let ccw = (end_angle - start_angle).rem_euclid(TAU);
        if clockwise {
            (TAU - ccw).rem_euclid(TAU)
        } else {
            ccw
        }
    }

    /// Expand an arc into linear commands.
    ///
    /// The result always ends at the literal target. Extrusion is split evenly
    /// over all segments, negative shares included; in absolute mode each
    /// segment carries the running total and the last one lands exactly on the
    /// target. Arcs without an `E` word become `G0` segments.
    pub fn tessellate(&self, command: &MotionCommand, start: &ArcStart) -> Vec<MotionCommand> {
        let clockwise = command.code == MotionCode::ArcCw;
        let origin = start.position;

        let target_xy_given = command.x.is_some() || command.y.is_some();
        let end = Vec3::new(
            command.x.unwrap_or(origin.x),
            command.y.unwrap_or(origin.y),
            command.z.unwrap_or(origin.z),
        );
        let center = Vec3::new(
            origin.x + command.i.unwrap_or(0.0),
            origin.y + command.j.unwrap_or(0.0),
            origin.z,
        );

        let closed = origin.planar_distance(&end) <= self.config.closure_tolerance;
        let full_circle = (command.p.is_some() && !target_xy_given) || closed;
        let sweep = self.sweep(origin, end, center, clockwise, full_circle);

        let radius = origin.planar_distance(&center);
        let start_angle = (origin.y - center.y).atan2(origin.x - center.x);
        let direction = if clockwise { -1.0 } else { 1.0 };

        let mut points = Vec::new();
        if radius > 0.0 && self.config.resolution > 0.0 {
            let mut k = 1;
            loop {
                let angle = k as f32 * self.config.resolution;
                if angle + ANGLE_EPSILON >= sweep {
                    break;
                }
                let theta = start_angle + direction * angle;
                points.push((center.x + radius * theta.cos(), center.y + radius * theta.sin()));
                k += 1;
            }
        }
        points.push((end.x, end.y));

        let delta = match command.e {
            Some(e) if start.relative => e,
            Some(e) => e - start.extrusion,
            None => 0.0,
        };
        let has_extrusion = command.e.is_some();
        let segments = points.len();
        let share = delta / segments as f32;

        trace!(
            "Arc: from=({:.3},{:.3}), to=({:.3},{:.3}), r={:.4}, sweep={:.4}, cw={}, segments={}",
            origin.x,
            origin.y,
            end.x,
            end.y,
            radius,
            sweep,
            clockwise,
            segments
        );

        points
            .into_iter()
            .enumerate()
            .map(|(idx, (x, y))| {
                let fraction = (idx + 1) as f32 / segments as f32;
                let last = idx + 1 == segments;
                let mut segment = MotionCommand::new(if has_extrusion {
                    MotionCode::Linear
                } else {
                    MotionCode::Rapid
                });
                segment.x = Some(x);
                segment.y = Some(y);
                segment.f = command.f;
                if command.z.is_some() {
                    segment.z = Some(if last {
                        end.z
                    } else {
                        origin.z + (end.z - origin.z) * fraction
                    });
                }
                if has_extrusion {
                    segment.e = Some(if start.relative {
                        share
                    } else if last {
                        start.extrusion + delta
                    } else {
                        start.extrusion + share * (idx + 1) as f32
                    });
                }
                segment
            })
            .collect()
    }
}
