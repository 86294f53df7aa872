//! Toolpath line types announced by `;TYPE:` comments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a move.
///
/// Slicer regions come from `;TYPE:` markers and stay in effect until the
/// next marker. `Travel`, `Retraction` and `ZSeamMarker` are assigned by the
/// motion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineType {
    #[default]
    None,
    OuterWall,
    InnerWall,
    Skin,
    Support,
    SkirtBrim,
    Infill,
    SupportInfill,
    SupportInterface,
    PrimeTower,
    Travel,
    FlowTravel,
    AdvanceTravel,
    ZSeamMarker,
    Retraction,
}

/// Substring patterns checked in order; the first hit wins.
const TYPE_PATTERNS: &[(&str, LineType)] = &[
    ("WALL-OUTER", LineType::OuterWall),
    ("WALL-INNER", LineType::InnerWall),
    ("SKIN", LineType::Skin),
    ("SUPPORT-INTERFACE", LineType::SupportInterface),
    ("SUPPORT-INFILL", LineType::SupportInfill),
    ("SUPPORT", LineType::Support),
    ("SKIRT", LineType::SkirtBrim),
    ("FILL", LineType::Infill),
    ("PRIME-TOWER", LineType::PrimeTower),
    ("Slow-Flow-Types", LineType::FlowTravel),
    ("Flow-In-Advance-Types", LineType::AdvanceTravel),
];

impl LineType {
    /// Every variant, in legend order
    pub const ALL: [LineType; 15] = [
        LineType::None,
        LineType::OuterWall,
        LineType::InnerWall,
        LineType::Skin,
        LineType::Support,
        LineType::SkirtBrim,
        LineType::Infill,
        LineType::SupportInfill,
        LineType::SupportInterface,
        LineType::PrimeTower,
        LineType::Travel,
        LineType::FlowTravel,
        LineType::AdvanceTravel,
        LineType::ZSeamMarker,
        LineType::Retraction,
    ];

    /// Map the payload of a `;TYPE:` comment to a line type.
    ///
    /// Accepts either the payload alone (`WALL-OUTER`) or the full comment
    /// line. Unknown payloads map to [`LineType::None`].
    pub fn from_type_comment(text: &str) -> LineType {
        TYPE_PATTERNS
            .iter()
            .find(|(pattern, _)| text.contains(pattern))
            .map(|(_, line_type)| *line_type)
            .unwrap_or(LineType::None)
    }

    /// Stable numeric key used by legends and shaders
    pub fn code(&self) -> u8 {
        match self {
            LineType::None => 0,
            LineType::OuterWall => 1,
            LineType::InnerWall => 2,
            LineType::Skin => 3,
            LineType::Support => 4,
            LineType::SkirtBrim => 5,
            LineType::Infill => 6,
            LineType::SupportInfill => 7,
            LineType::SupportInterface => 10,
            LineType::PrimeTower => 11,
            LineType::Travel => 13,
            LineType::FlowTravel => 15,
            LineType::AdvanceTravel => 16,
            LineType::ZSeamMarker => 17,
            LineType::Retraction => 18,
        }
    }

    /// Inverse of [`LineType::code`]
    pub fn from_code(code: u8) -> Option<LineType> {
        LineType::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LineType::None => "None",
            LineType::OuterWall => "Outer Perimeter",
            LineType::InnerWall => "Inner Perimeter",
            LineType::Skin => "Skin",
            LineType::Support => "Support",
            LineType::SkirtBrim => "SkirtBrim",
            LineType::Infill => "Infill",
            LineType::SupportInfill => "SupportInfill",
            LineType::SupportInterface => "SupportInterface",
            LineType::PrimeTower => "PrimeTower",
            LineType::Travel => "Travel",
            LineType::FlowTravel => "FlowTravel",
            LineType::AdvanceTravel => "AdvanceTravel",
            LineType::ZSeamMarker => "Zseam",
            LineType::Retraction => "Retraction",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
