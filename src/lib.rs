//! # GCodeView
//!
//! Reconstructs layered motion models from 3D-printer slicer G-code.
//!
//! ## Architecture
//!
//! GCodeView is organized as a workspace with multiple crates:
//!
//! 1. **gcodeview-core** - Shared geometry, errors, progress tracing, units
//! 2. **gcodeview-settings** - Reconstruction config loading and validation
//! 3. **gcodeview-motion** - Segmentation, arc tessellation, motion model
//! 4. **gcodeview** - Command-line binary that ties the crates together

pub use gcodeview_core::{
    convert_feed_rate, Bounds3, CallbackTracer, CancelToken, Error, FeedRateUnits, GcodeError,
    NullTracer, Result, Tracer, ValueRange, Vec3,
};
pub use gcodeview_motion::{
    scan_preamble, speed_legend, type_legend, BaseInfo, GcodeModel, GcodeReconstructor, LineType,
    Move, PrintInfo, ReconstructError, SlicedGcode,
};
pub use gcodeview_settings::{ExtrusionMode, ReconstructConfig};

use std::fmt::Write as _;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Number of rows in the printed speed legend
const SPEED_LEGEND_BUCKETS: usize = 5;

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, leaving stdout for reports
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Human-readable overview of a reconstructed model
pub fn format_summary(model: &GcodeModel) -> String {
    let info = model.base_info();
    let print = model.print_info();
    let mut out = String::new();

    let _ = writeln!(out, "Layers:       {}", info.layers);
    let _ = writeln!(out, "Moves:        {}", info.total_steps);
    let _ = writeln!(out, "Positions:    {}", model.positions().len());
    let _ = writeln!(out, "Nozzles:      {}", info.nozzle_count);
    let _ = writeln!(out, "Seams:        {}", model.seams().len());
    let _ = writeln!(out, "Retractions:  {}", model.retractions().len());
    let _ = writeln!(
        out,
        "Machine:      {} x {} x {} mm",
        print.machine_width, print.machine_depth, print.machine_height
    );
    if print.print_time > 0 {
        let _ = writeln!(out, "Print time:   {} s", print.print_time);
    }
    if print.filament_used > 0.0 {
        let _ = writeln!(out, "Filament:     {} m", print.filament_used);
    }

    if info.bounds.is_valid() {
        let size = info.bounds.size();
        let _ = writeln!(
            out,
            "Extent:       {:.2} x {:.2} x {:.2} mm",
            size.x, size.y, size.z
        );
    }

    write_range(&mut out, "Line width", info.line_width, "mm");
    write_range(&mut out, "Layer height", info.layer_height, "mm");
    write_range(&mut out, "Extrusion", info.flow, "mm");
    write_range(&mut out, "Flow", info.volumetric_flow, "mm³/s");
    write_range(&mut out, "Layer time", info.layer_time, "s");
    write_range(&mut out, "Nozzle temp", info.temperature, "°C");

    let legend = speed_legend(info, SPEED_LEGEND_BUCKETS);
    if !legend.is_empty() {
        let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
        let _ = writeln!(
            out,
            "Speeds:       {} {}",
            labels.join(" / "),
            FeedRateUnits::MmPerSec
        );
    }

    out
}

fn write_range(out: &mut String, label: &str, range: Option<ValueRange>, unit: &str) {
    if let Some(range) = range {
        let _ = writeln!(
            out,
            "{:<14}{:.3} - {:.3} {}",
            format!("{}:", label),
            range.min,
            range.max,
            unit
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_empty_model() {
        let model = GcodeModel::default();
        let summary = format_summary(&model);
        assert!(summary.contains("Layers:       0"));
        assert!(!summary.contains("Speeds:"));
        assert!(!summary.contains("Extent:"));
    }

    #[test]
    fn test_summary_lists_ranges() {
        let text = ";LAYER:0\nG0 F6000 X0 Y0 Z0.2\n;TYPE:WALL-OUTER\nG1 F1200 X10 Y0 E1\nG1 F3000 X10 Y10 E2\n";
        let model = GcodeReconstructor::default()
            .reconstruct_text(text, &mut NullTracer)
            .unwrap();
        let summary = format_summary(&model);
        assert!(summary.contains("Layers:       1"));
        assert!(summary.contains("Moves:        3"));
        assert!(summary.contains("Speeds:       50.0 / 42.5 / 35.0 / 27.5 / 20.0 mm/s"));
        assert!(summary.contains("Extent:       10.00 x 10.00 x 0.00 mm"));
        assert!(summary.contains("Extrusion:    1.000 - 1.000 mm"));
        assert!(summary.contains("Flow:"));
    }
}
