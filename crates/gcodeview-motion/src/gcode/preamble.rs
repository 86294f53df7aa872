//! Print metadata scanned from the file preamble.
//!
//! Slicers write machine dimensions, timing and mode flags as comments before
//! the first layer. Everything here is optional; missing keys keep defaults.

use super::tokenizer::{classify_line, LineKind};
use crate::model::samples::ThermalState;
use gcodeview_settings::ExtrusionMode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Added to `MAXX`/`MAXY`/`MAXZ` when the machine size is not declared
const MODEL_EXTENT_GAP: f32 = 20.0;

/// Belt printer flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeltType {
    #[default]
    None,
    /// `;machine is belt:true`
    Belt,
    /// `Crealitybelt`
    CrealityBelt,
}

/// Metadata from the preamble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintInfo {
    pub machine_height: f32,
    pub machine_width: f32,
    pub machine_depth: f32,
    /// Estimated print time in seconds
    pub print_time: u32,
    /// Filament used, as written by the slicer
    pub filament_used: f32,
    pub spiral_mode: bool,
    pub belt_type: BeltType,
    pub belt_offset: f32,
    pub belt_offset_y: f32,
    /// Mode selected by the last `M82`/`M83`
    pub extrusion_mode: ExtrusionMode,
    /// Heater and fan targets in effect when the first layer starts
    pub initial_state: ThermalState,
}

impl Default for PrintInfo {
    fn default() -> Self {
        Self {
            machine_height: 250.0,
            machine_width: 220.0,
            machine_depth: 220.0,
            print_time: 0,
            filament_used: 0.0,
            spiral_mode: false,
            belt_type: BeltType::None,
            belt_offset: 0.0,
            belt_offset_y: 0.0,
            extrusion_mode: ExtrusionMode::Absolute,
            initial_state: ThermalState::default(),
        }
    }
}

fn print_time_regex() -> &'static Regex {
    static PRINT_TIME: OnceLock<Regex> = OnceLock::new();
    PRINT_TIME.get_or_init(|| Regex::new(r";TIME:\s*(\d+)").expect("invalid regex pattern"))
}

fn extrusion_mode_regex() -> &'static Regex {
    static EXTRUSION_MODE: OnceLock<Regex> = OnceLock::new();
    EXTRUSION_MODE
        .get_or_init(|| Regex::new(r"(?m)^\s*M8([23])\b").expect("invalid regex pattern"))
}

fn keyed_number_regex() -> &'static Regex {
    static KEYED_NUMBER: OnceLock<Regex> = OnceLock::new();
    KEYED_NUMBER.get_or_init(|| {
        Regex::new(r"(?m)^\s*;?\s*([A-Za-z][A-Za-z ]*?)\s*:\s*(-?\d+(?:\.\d*)?)")
            .expect("invalid regex pattern")
    })
}

/// Numeric `<key>:<value>` comments, first occurrence per key
fn keyed_numbers(text: &str) -> HashMap<&str, f32> {
    let mut values = HashMap::new();
    for caps in keyed_number_regex().captures_iter(text) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if let Ok(value) = value.as_str().parse::<f32>() {
            values.entry(key.as_str()).or_insert(value);
        }
    }
    values
}

/// Scan the preamble block for print metadata
pub fn scan_preamble(prefix: &str) -> PrintInfo {
    let mut info = PrintInfo::default();
    let keyed = keyed_numbers(prefix);
    let keyed_number = |key: &str| keyed.get(key).copied();

    if let Some(seconds) = print_time_regex()
        .captures(prefix)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        info.print_time = seconds;
    }
    if let Some(used) = keyed_number("Filament used") {
        info.filament_used = used;
    }
    if let Some(offset) = keyed_number("machine belt offset") {
        info.belt_offset = offset;
    }
    if let Some(offset) = keyed_number("machine belt offset Y") {
        info.belt_offset_y = offset;
    }

    let height = keyed_number("Machine Height");
    let width = keyed_number("Machine Width");
    let depth = keyed_number("Machine Depth");
    info.machine_height = height.unwrap_or(info.machine_height);
    info.machine_width = width.unwrap_or(info.machine_width);
    info.machine_depth = depth.unwrap_or(info.machine_depth);

    if height.is_none() || width.is_none() || depth.is_none() {
        if let Some(max_x) = keyed_number("MAXX") {
            info.machine_width = max_x + MODEL_EXTENT_GAP;
        }
        if let Some(max_y) = keyed_number("MAXY") {
            info.machine_depth = max_y + MODEL_EXTENT_GAP;
        }
        if let Some(max_z) = keyed_number("MAXZ") {
            info.machine_height = max_z + MODEL_EXTENT_GAP;
        }
    }

    if let Some(last) = extrusion_mode_regex().captures_iter(prefix).last() {
        if last.get(1).is_some_and(|m| m.as_str() == "3") {
            info.extrusion_mode = ExtrusionMode::Relative;
        }
    }

    info.spiral_mode = prefix.contains(";Vase Model:true");
    if prefix.contains(";machine is belt:true") {
        info.belt_type = BeltType::Belt;
    }
    if prefix.contains("Crealitybelt") {
        info.belt_type = BeltType::CrealityBelt;
    }

    for line in prefix.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let LineKind::Thermal(command) = classify_line(line).kind {
            info.initial_state.apply(command);
        }
    }

    debug!(
        "Preamble: print_time={}s, machine={}x{}x{}, mode={:?}, spiral={}, belt={:?}",
        info.print_time,
        info.machine_width,
        info.machine_depth,
        info.machine_height,
        info.extrusion_mode,
        info.spiral_mode,
        info.belt_type
    );

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURA_HEADER: &str = ";FLAVOR:Marlin
;TIME:6942
;Filament used: 3.21706m
;Layer height: 0.2
;MINX:80.2
;MAXX:139.8
;MAXY:140.1
;MAXZ:30.2
;Machine Height:250
;Machine Width:235
;Machine Depth:235
M140 S60
M104 S200
M106 S255
M82
G92 E0
";

    #[test]
    fn test_scan_cura_header() {
        let info = scan_preamble(CURA_HEADER);
        assert_eq!(info.print_time, 6942);
        assert!((info.filament_used - 3.21706).abs() < 1e-5);
        assert_eq!(info.machine_height, 250.0);
        assert_eq!(info.machine_width, 235.0);
        assert_eq!(info.machine_depth, 235.0);
        assert_eq!(info.extrusion_mode, ExtrusionMode::Absolute);
        assert_eq!(info.initial_state.temperature.bed, 60.0);
        assert_eq!(info.initial_state.temperature.nozzle, 200.0);
        assert_eq!(info.initial_state.fan.fan_speed, 255.0);
    }

    #[test]
    fn test_machine_size_falls_back_to_model_extent() {
        let info = scan_preamble(";MAXX:100\n;MAXY:120.5\n;MAXZ:40\n;Machine Height:300\n");
        assert_eq!(info.machine_width, 120.0);
        assert_eq!(info.machine_depth, 140.5);
        assert_eq!(info.machine_height, 60.0);
    }

    #[test]
    fn test_last_extrusion_mode_wins() {
        assert_eq!(
            scan_preamble("M82\nM83\n").extrusion_mode,
            ExtrusionMode::Relative
        );
        assert_eq!(
            scan_preamble("M83\nG92 E0\nM82\n").extrusion_mode,
            ExtrusionMode::Absolute
        );
        assert_eq!(scan_preamble("").extrusion_mode, ExtrusionMode::Absolute);
    }

    #[test]
    fn test_mode_flags() {
        let info = scan_preamble(";Vase Model:true\n;machine is belt:true\n");
        assert!(info.spiral_mode);
        assert_eq!(info.belt_type, BeltType::Belt);

        let info = scan_preamble(";machine is belt:true\n;printer:Crealitybelt\n");
        assert_eq!(info.belt_type, BeltType::CrealityBelt);
    }

    #[test]
    fn test_belt_offsets() {
        let info = scan_preamble(";machine belt offset:10.5\n;machine belt offset Y:-3.25\n");
        assert_eq!(info.belt_offset, 10.5);
        assert_eq!(info.belt_offset_y, -3.25);
    }

    #[test]
    fn test_empty_preamble_uses_defaults() {
        assert_eq!(scan_preamble(""), PrintInfo::default());
    }

    #[test]
    fn test_keyed_numbers_first_occurrence_wins() {
        let values = keyed_numbers(";Machine Width:235\n;Machine Width:300\n;Layer height: 0.2\n;FLAVOR:Marlin\n");
        assert_eq!(values.get("Machine Width"), Some(&235.0));
        assert_eq!(values.get("Layer height"), Some(&0.2));
        assert_eq!(values.get("FLAVOR"), None);
    }
}
