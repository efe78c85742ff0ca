use std::path::Path;
use std::time::Duration;

use clap::Parser;
use gestura_cli::{Cli, CliError, run};
use gestura_core::{Insets, MotionAction, MotionEvent, ScreenGeometry, Vector};
use gestura_runtime::TraceWriter;
use tempfile::tempdir;

fn ev(action: MotionAction, down: u64, at: u64, x: f32, y: f32) -> MotionEvent {
    MotionEvent::new(action, Duration::from_millis(down), Duration::from_millis(at))
        .with_pointer(0, Vector::new(x, y))
}

fn write_edge_swipe(path: &Path) {
    let screen = ScreenGeometry::new(1000.0, 2000.0).with_insets(Insets::NONE);
    let mut writer = TraceWriter::plain(path, "cli", screen).expect("create trace");
    writer
        .record_motion(&ev(MotionAction::Down, 0, 0, 40.0, 700.0))
        .expect("down");
    writer
        .record_motion(&ev(MotionAction::Move, 0, 40, 40.0, 900.0))
        .expect("move");
    writer
        .record_motion(&ev(MotionAction::Up, 0, 90, 40.0, 1200.0))
        .expect("up");
    writer.finish().expect("finish");
}

fn run_args(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::parse_from(std::iter::once("gestura").chain(args.iter().copied()));
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out).expect("utf8 output"))
}

#[test]
fn replay_prints_detected_gestures() {
    let temp = tempdir().expect("tempdir");
    let trace = temp.path().join("edge.jsonl");
    write_edge_swipe(&trace);

    let text = run_args(&["replay", trace.to_str().expect("path")]).expect("replay");
    assert!(text.starts_with("session `cli`: 3 motion events, 1 gestures"), "{text}");
    assert!(text.contains("SWIPE_DOWN_LEFT_EDGE"), "{text}");
    assert!(text.contains("action.down_left"), "{text}");
}

#[test]
fn replay_json_honours_settings() {
    let temp = tempdir().expect("tempdir");
    let trace = temp.path().join("edge.jsonl");
    write_edge_swipe(&trace);
    let settings = temp.path().join("no-edge.toml");
    std::fs::write(&settings, "[preferences]\nedge_swipe = false\n").expect("settings");

    let text = run_args(&[
        "replay",
        trace.to_str().expect("path"),
        "--settings",
        settings.to_str().expect("path"),
        "--json",
    ])
    .expect("replay");
    let report: serde_json::Value = serde_json::from_str(&text).expect("json report");
    assert_eq!(report["session"], "cli");
    assert_eq!(report["motion_events"], 3);
    assert_eq!(report["gestures"][0]["gesture"], "action.down");
    assert_eq!(report["gestures"][0]["name"], "SWIPE_DOWN");
    assert_eq!(report["gestures"][0]["episode"], 1);
    assert_eq!(report["gestures"][0]["at_ms"], 90);
}

#[test]
fn replay_rejects_a_trace_without_header() {
    let temp = tempdir().expect("tempdir");
    let trace = temp.path().join("bad.jsonl");
    std::fs::write(&trace, "{\"event\":\"trace_summary\",\"total_events\":0,\"total_duration_ms\":0}\n")
        .expect("write");

    let error = run_args(&["replay", trace.to_str().expect("path")]).expect_err("no header");
    assert!(matches!(error, CliError::Trace { .. }));
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn gestures_json_reflects_preferences() {
    let temp = tempdir().expect("tempdir");
    let settings = temp.path().join("prefs.json");
    std::fs::write(&settings, r#"{ "preferences": { "double_swipe": false } }"#).expect("write");

    let text = run_args(&["gestures", "--settings", settings.to_str().expect("path"), "--json"])
        .expect("gestures");
    let rows: Vec<serde_json::Value> = serde_json::from_str(&text).expect("json rows");
    assert_eq!(rows.len(), 35);

    let enabled = |name: &str| {
        rows.iter()
            .find(|row| row["name"] == name)
            .map(|row| row["enabled"] == true)
            .expect("row present")
    };
    assert!(!enabled("SWIPE_UP_DOUBLE"));
    assert!(enabled("SWIPE_UP_LEFT_EDGE"));
    assert!(enabled("LONG_CLICK"));
}

#[test]
fn check_accepts_valid_settings() {
    let temp = tempdir().expect("tempdir");
    let settings = temp.path().join("ok.toml");
    std::fs::write(
        &settings,
        "density = 3.0\n[classifier.screen]\nwidth = 1440.0\nheight = 3120.0\n",
    )
    .expect("write");

    let text = run_args(&["check", settings.to_str().expect("path")]).expect("check");
    assert!(text.starts_with("ok: "), "{text}");
    assert!(text.contains("touch slop 24 px"), "{text}");
    assert!(text.contains("screen 1440x3120"), "{text}");

    let json = run_args(&["check", settings.to_str().expect("path"), "--json"]).expect("check");
    let report: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(report["status"], "ok");
    assert_eq!(report["settings"]["density"], 3.0);
}

#[test]
fn check_reports_every_problem() {
    let temp = tempdir().expect("tempdir");
    let settings = temp.path().join("bad.toml");
    std::fs::write(
        &settings,
        "[classifier]\nmin_triangle_height = 0.0\n[classifier.metrics]\nlong_press_timeout_ms = 0\n",
    )
    .expect("write");

    let error = run_args(&["check", settings.to_str().expect("path")]).expect_err("invalid");
    match &error {
        CliError::Invalid { problems, .. } => {
            assert!(problems.iter().any(|p| p.contains("min_triangle_height")));
            assert!(problems.iter().any(|p| p.contains("long_press_timeout")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn check_rejects_unknown_extension() {
    let temp = tempdir().expect("tempdir");
    let settings = temp.path().join("gestura.yaml");
    std::fs::write(&settings, "preferences: {}\n").expect("write");
    let error = run_args(&["check", settings.to_str().expect("path")]).expect_err("format");
    assert!(matches!(error, CliError::Settings { .. }));
}
