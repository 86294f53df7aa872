use std::process::Command;
use tempfile::TempDir;

const SAMPLE: &str = ";FLAVOR:Marlin
;TIME:120
;Filament used: 0.05m
M140 S60
M104 S200
M82
;LAYER:0
G0 F6000 X10 Y10 Z0.2
;TYPE:WALL-OUTER
G1 F1200 X20 Y10 E1
G1 X20 Y20 E2
;TIME_ELAPSED:12.5
;LAYER:1
G0 X10 Y10 Z0.4
G1 X20 Y10 E3
;TIME_ELAPSED:20
;End of Gcode
M104 S0
";

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gcodeview"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run gcodeview")
}

#[test]
fn test_summary_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("part.gcode");
    std::fs::write(&input, SAMPLE).unwrap();

    let output = run(&[input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Layers:       2"));
    assert!(stdout.contains("Print time:   120 s"));
}

#[test]
fn test_json_output_to_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("part.gcode");
    let report = dir.path().join("model.json");
    std::fs::write(&input, SAMPLE).unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        "--json",
        "--output",
        report.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["base_info"]["layers"], 2);
    assert_eq!(json["base_info"]["layer_numbers"], serde_json::json!([0, 1]));
    assert_eq!(json["moves"].as_array().unwrap().len(), 5);
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&[dir.path().join("absent.gcode").to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn test_rejects_unknown_extrusion_mode() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("part.gcode");
    std::fs::write(&input, SAMPLE).unwrap();
    let output = run(&[input.to_str().unwrap(), "--extrusion", "sideways"]);
    assert!(!output.status.success());
}
