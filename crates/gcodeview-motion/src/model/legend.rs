//! Legend tables for line types and speeds.

use super::BaseInfo;
use crate::gcode::LineType;
use gcodeview_core::{convert_feed_rate, FeedRateUnits};
use serde::Serialize;

/// One row of the line-type legend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypeLegendEntry {
    pub line_type: LineType,
    pub code: u8,
    pub label: &'static str,
    /// `#RRGGBB`
    pub color: &'static str,
    /// Shown when a file is first opened
    pub visible: bool,
}

const TYPE_COLORS: &[(LineType, &str, bool)] = &[
    (LineType::OuterWall, "#772D28", true),
    (LineType::InnerWall, "#028C05", true),
    (LineType::Skin, "#FFB27F", true),
    (LineType::Support, "#058C8C", true),
    (LineType::SkirtBrim, "#511E54", true),
    (LineType::Infill, "#E5DB33", true),
    (LineType::SupportInfill, "#B5BC38", true),
    (LineType::SupportInterface, "#D63A11", true),
    (LineType::PrimeTower, "#339919", true),
    (LineType::Travel, "#60595F", false),
    (LineType::ZSeamMarker, "#FFFFFF", true),
    (LineType::Retraction, "#FF00FF", false),
];

/// Line types shown in the structure legend
pub fn type_legend() -> Vec<TypeLegendEntry> {
    TYPE_COLORS
        .iter()
        .map(|&(line_type, color, visible)| TypeLegendEntry {
            line_type,
            code: line_type.code(),
            label: line_type.label(),
            color,
            visible,
        })
        .collect()
}

/// One row of the speed legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedLegendEntry {
    /// Feed rate in mm/min
    pub feed_rate: f32,
    /// mm/s with one decimal
    pub label: String,
}

/// Evenly spaced speed labels between the raw feed rate extremes, fastest
/// first. Empty without speed data or with fewer than two buckets.
pub fn speed_legend(base: &BaseInfo, buckets: usize) -> Vec<SpeedLegendEntry> {
    let Some(range) = base.speed else {
        return Vec::new();
    };
    if buckets < 2 {
        return Vec::new();
    }

    let span = if range.span() > 0.0 { range.span() } else { range.max };
    let step = span / (buckets - 1) as f32;
    (0..buckets)
        .rev()
        .map(|i| {
            let feed_rate = range.min + step * i as f32;
            SpeedLegendEntry {
                feed_rate,
                label: format!("{:.1}", convert_feed_rate(feed_rate, FeedRateUnits::MmPerSec)),
            }
        })
        .collect()
}
