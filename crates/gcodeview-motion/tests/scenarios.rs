use gcodeview_core::{NullTracer, Tracer, Vec3};
use gcodeview_motion::{GcodeReconstructor, LineType, ReconstructError, SlicedGcode};
use gcodeview_settings::{ExtrusionMode, ReconstructConfig};

fn reconstructor(mode: ExtrusionMode) -> GcodeReconstructor {
    GcodeReconstructor::new(ReconstructConfig {
        extrusion_mode: Some(mode),
        ..Default::default()
    })
    .unwrap()
}

fn layers(blocks: &[&str]) -> SlicedGcode {
    SlicedGcode::new("", blocks.iter().map(|b| b.to_string()).collect(), "")
}

/// Stops after a fixed number of progress reports
struct StopAfter {
    limit: usize,
    reports: Vec<f32>,
    failures: Vec<String>,
}

impl StopAfter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl Tracer for StopAfter {
    fn progress(&mut self, fraction: f32) {
        self.reports.push(fraction);
    }

    fn interrupted(&self) -> bool {
        self.reports.len() >= self.limit
    }

    fn failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}

#[test]
fn test_outer_wall_moves() {
    let gcode = layers(&[";LAYER:0\n;TYPE:WALL-OUTER\nG1 X10 Y0 Z0.2 E1.0\nG1 X10 Y10 E2.0\n"]);
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut NullTracer)
        .unwrap();

    let moves = model.moves();
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.line_type == LineType::OuterWall));
    assert_eq!(moves[0].extrusion_delta, 1.0);
    assert_eq!(moves[1].extrusion_delta, 1.0);
    assert_eq!(model.trait_position(0, 1), Some(Vec3::new(10.0, 10.0, 0.2)));
}

#[test]
fn test_retraction_in_place() {
    let gcode = layers(&[";LAYER:0\nG1 X5 Y5 E5.0\nG1 X5 Y5 E3.0\n"]);
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut NullTracer)
        .unwrap();

    assert_eq!(model.positions().len(), 2);
    assert_eq!(model.moves().len(), 1);
    assert_eq!(model.retractions(), &[1]);
}

#[test]
fn test_tool_change_sets_extruder() {
    let gcode = layers(&[";LAYER:0\nG1 X1 Y1 Z0.2 E1\nT1\nG1 X2 Y1 E2\n"]);
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut NullTracer)
        .unwrap();

    assert_eq!(model.moves()[0].extruder, 0);
    assert_eq!(model.moves()[1].extruder, 1);
    assert!(model.base_info().nozzle_count >= 2);
}

#[test]
fn test_missing_layer_marker_collapses_layers() {
    let gcode = layers(&[
        ";LAYER:0\nG1 X1 Y0 Z0.2 E1\n",
        "G1 X2 Y0 E2\nG1 X3 Y0 E3\n",
        ";LAYER:2\nG1 X4 Y0 Z0.4 E4\n",
    ]);
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut NullTracer)
        .unwrap();

    let info = model.base_info();
    assert_eq!(info.layers, 1);
    assert_eq!(info.steps, vec![4]);
    assert!(info.layer_numbers.is_empty());
    assert_eq!(model.step_index_maps().len(), 1);
    assert_eq!(model.step_index_maps()[0], vec![1, 2, 3, 5]);
    assert_eq!(model.layer_move_range(0), Some(0..4));
}

#[test]
fn test_cancellation_returns_partial_model() {
    let blocks: Vec<String> = (0..10)
        .map(|i| {
            format!(
                ";LAYER:{i}\nG1 X{} Y0 Z{:.1} E{}\n",
                i + 1,
                0.2 * (i + 1) as f32,
                i + 1
            )
        })
        .collect();
    let gcode = SlicedGcode::new("", blocks, "");
    let mut tracer = StopAfter::new(3);

    let err = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut tracer)
        .unwrap_err();

    match &err {
        ReconstructError::Interrupted {
            layers_done,
            layers_total,
            partial,
            ..
        } => {
            assert_eq!(*layers_done, 3);
            assert_eq!(*layers_total, 10);
            assert_eq!(partial.layers(), 1);
            assert_eq!(partial.total_steps(), 3);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(tracer.reports.len(), 3);
    assert_eq!(tracer.failures.len(), 1);
}

#[test]
fn test_marked_layers_and_queries() {
    let text = "\
;FLAVOR:Marlin
;TIME:120
M140 S60
M104 S210
M82
;LAYER:0
G0 F6000 X10 Y10 Z0.2
;TYPE:WALL-OUTER
G1 F1800 X20 Y10 E1
G1 X20 Y20 E2
;TIME_ELAPSED:30
;LAYER:1
G0 F6000 X10 Y10 Z0.4
;TYPE:FILL
G1 F3000 X20 Y20 E3
;TIME_ELAPSED:50
;End of Gcode
M84
";
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct_text(text, &mut NullTracer)
        .unwrap();
    let info = model.base_info();

    assert_eq!(info.layers, 2);
    assert_eq!(info.layer_numbers, vec![0, 1]);
    assert_eq!(info.steps, vec![3, 2]);
    assert_eq!(model.print_info().print_time, 120);
    assert_eq!(model.seams(), &[1]);
    assert_eq!(info.layer_times.get(&0), Some(&30.0));
    assert_eq!(info.layer_times.get(&1), Some(&20.0));

    // speeds normalize over non-travel feed rates: 1800 -> 0, 3000 -> 1
    assert_eq!(model.trait_speed(0, 1), Some(0.0));
    assert_eq!(model.trait_speed(1, 1), Some(1.0));
    assert_eq!(model.trait_speed(1, 0), Some(1.0));

    let infill = model.move_at(1, 1).unwrap();
    assert_eq!(infill.line_type, LineType::Infill);
    assert_eq!(model.temperature_of(infill).unwrap().nozzle, 210.0);
    assert_eq!(model.temperature_of(infill).unwrap().bed, 60.0);

    assert_eq!(model.source_line_for_step(1, 1), Some(3));
    assert_eq!(model.step_for_source_line(1, 2), Some(0));
    assert_eq!(info.bounds.max, Vec3::new(20.0, 20.0, 0.4));
}

#[test]
fn test_arc_through_layer() {
    let gcode = layers(&[";LAYER:0\nG1 X10 Y0 Z0.2 F1200\n;TYPE:WALL-INNER\nG3 X0 Y10 I-10 J0 E2\n"]);
    let model = reconstructor(ExtrusionMode::Absolute)
        .reconstruct(&gcode, &mut NullTracer)
        .unwrap();

    let arc_moves: Vec<_> = model
        .moves()
        .iter()
        .filter(|m| m.line_type == LineType::InnerWall)
        .collect();
    assert_eq!(arc_moves.len(), 18);
    let total: f32 = arc_moves.iter().map(|m| m.extrusion_delta).sum();
    assert!((total - 2.0).abs() < 1e-4);

    // every segment maps back to the arc's source line
    let map = &model.step_index_maps()[0];
    assert!(map[1..].iter().all(|&ordinal| ordinal == 3));
    assert_eq!(model.positions().last(), Some(&Vec3::new(0.0, 10.0, 0.2)));
}
