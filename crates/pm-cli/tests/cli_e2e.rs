//! End-to-end tests for the `pm-report` binary.
//!
//! Every command runs with an isolated settings environment so a settings
//! file on the host never leaks into the results.

use assert_cmd::Command;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use serde_json::Value;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {
        "pm_id": "PM-001",
        "pmtitle": "Chiller inspection",
        "scheduled_date": "2024-06-10T09:00:00",
        "frequency": "weekly",
        "machines": [{"machine_id": "CH-1", "name": "Chiller 1", "location": "Roof"}],
        "before_image_url": "/media/pm001_before.jpg"
    },
    {
        "pm_id": "PM-002",
        "pmtitle": "Pump lubrication",
        "scheduled_date": "2024-06-20",
        "completed_date": "2024-06-12T15:30:00",
        "frequency": "monthly"
    },
    {
        "pm_id": "PM-003",
        "pmtitle": "Boiler check",
        "scheduled_date": "2024-06-30",
        "frequency": "custom",
        "custom_days": 45
    },
    {"pmtitle": "missing id", "scheduled_date": "2024-06-01"}
]"#;

fn pm_report(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pm-report").expect("pm-report binary should exist");
    cmd.env_remove("PM_REPORT_CONFIG")
        .env_remove("PM_REPORT_CONFIG_DIR")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", config_home)
        .env("PM_LOG", "error");
    cmd
}

fn write_records(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("records.json");
    std::fs::write(&path, RECORDS).unwrap();
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 60, 90])))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

// ============================================================================
// Argument handling
// ============================================================================

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    pm_report(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compose"))
        .stdout(predicate::str::contains("uploads"));
}

#[test]
fn unknown_command_is_args_error() {
    let dir = TempDir::new().unwrap();
    pm_report(dir.path())
        .arg("nonexistent-command")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn invalid_status_value_is_args_error() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    pm_report(dir.path())
        .args(["compose", "--status", "archived"])
        .arg(&records)
        .assert()
        .code(10);
}

// ============================================================================
// compose
// ============================================================================

#[test]
fn compose_writes_html_by_default() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let out_dir = dir.path().join("out");

    let output = pm_report(dir.path())
        .args(["compose", "--title", "Weekly Checks", "--today", "2024-06-15"])
        .arg(&records)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let summary = stdout_json(&output);
    assert_eq!(summary["status"], "OK");
    assert_eq!(summary["records_found"], 3);
    assert_eq!(summary["stats"]["total"], 3);
    assert_eq!(summary["stats"]["completed"], 1);
    assert_eq!(summary["stats"]["overdue"], 1);
    assert_eq!(summary["stats"]["pending"], 1);
    assert_eq!(summary["skipped_records"].as_array().unwrap().len(), 1);

    let html_path = out_dir.join("weekly-checks-2024-06-15.html");
    assert!(html_path.exists());
    let html = std::fs::read_to_string(html_path).unwrap();
    assert!(html.contains("Weekly Checks"));
    assert!(html.contains("Chiller inspection"));
    assert!(html.contains("Page 1 of"));
    assert!(!out_dir.join("weekly-checks-2024-06-15.json").exists());
}

#[test]
fn compose_json_model_and_html() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = pm_report(dir.path())
        .args(["compose", "--json", "--html", "--images", "--today", "2024-06-15"])
        .args(["--rows-per-page", "2"])
        .arg(&records)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let summary = stdout_json(&output);
    assert_eq!(summary["files"].as_array().unwrap().len(), 2);
    assert_eq!(summary["pages"]["table"], 2);

    let model_path = dir
        .path()
        .join("preventive-maintenance-report-2024-06-15.json");
    let model: Value =
        serde_json::from_str(&std::fs::read_to_string(model_path).unwrap()).unwrap();
    let pages = model["pages"].as_array().unwrap();
    assert_eq!(pages[0]["kind"], "summary");
    assert_eq!(pages[1]["kind"], "table");
    assert!(pages.iter().any(|p| p["kind"] == "detail"));
}

#[test]
fn compose_with_no_matches_exits_one() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = pm_report(dir.path())
        .args(["compose", "--search", "no such task", "--today", "2024-06-15"])
        .arg(&records)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let summary = stdout_json(&output);
    assert_eq!(summary["status"], "OK_EMPTY");
    assert_eq!(summary["pages"]["total"], 1);

    let html = std::fs::read_to_string(
        dir.path()
            .join("preventive-maintenance-report-2024-06-15.html"),
    )
    .unwrap();
    assert!(html.contains("No maintenance tasks match the selected filters."));
}

#[test]
fn compose_status_filter() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = pm_report(dir.path())
        .args(["compose", "--status", "completed", "--no-details", "--json"])
        .args(["--today", "2024-06-15"])
        .arg(&records)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let summary = stdout_json(&output);
    assert_eq!(summary["stats"]["total"], 1);
    assert_eq!(summary["stats"]["completed"], 1);
    assert_eq!(summary["pages"]["detail"], 0);
}

#[test]
fn compose_missing_records_is_io_error() {
    let dir = TempDir::new().unwrap();
    pm_report(dir.path())
        .args(["compose", "does-not-exist.json"])
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .code(13)
        .stderr(predicate::str::contains("does-not-exist.json"));
}

#[test]
fn compose_malformed_records_is_input_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, r#"{"unexpected": true}"#).unwrap();
    pm_report(dir.path())
        .arg("compose")
        .arg(&path)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .code(12)
        .stderr(predicate::str::contains("records error"));
}

#[test]
fn compose_zero_rows_per_page_is_args_error() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    pm_report(dir.path())
        .args(["compose", "--rows-per-page", "0"])
        .arg(&records)
        .assert()
        .code(10);
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_show_uses_builtin_defaults() {
    let dir = TempDir::new().unwrap();
    let output = pm_report(dir.path())
        .args(["config", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let shown = stdout_json(&output);
    assert_eq!(shown["source"], "builtin default");
    assert_eq!(shown["path"], Value::Null);
    assert_eq!(shown["settings"]["uploads"]["max_bytes"], 5 * 1024 * 1024);
    assert_eq!(shown["logging"]["level"], "error");
    assert_eq!(shown["logging"]["format"], "human");
}

#[test]
fn config_show_reports_cli_logging_flags() {
    let dir = TempDir::new().unwrap();
    let output = pm_report(dir.path())
        .env("PM_LOG_TIMESTAMPS", "off")
        .args(["-vv", "--log-format", "jsonl", "config", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let shown = stdout_json(&output);
    assert_eq!(shown["logging"]["level"], "trace");
    assert_eq!(shown["logging"]["format"], "jsonl");
    assert_eq!(shown["logging"]["timestamps"], false);
}

#[test]
fn config_file_title_reaches_report() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, r#"{"export": {"title": "Plant North"}}"#).unwrap();

    let output = pm_report(dir.path())
        .arg("--config")
        .arg(&settings)
        .args(["compose", "--today", "2024-06-15"])
        .arg(&records)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("plant-north-2024-06-15.html").exists());
}

#[test]
fn config_validate_reports_invalid_values() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("bad.json");
    std::fs::write(&settings, r#"{"uploads": {"jpeg_quality": 0}}"#).unwrap();

    pm_report(dir.path())
        .args(["config", "validate"])
        .arg(&settings)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("uploads.jpeg_quality"));
}

#[test]
fn missing_config_flag_is_config_error() {
    let dir = TempDir::new().unwrap();
    pm_report(dir.path())
        .args(["--config", "/nonexistent/report.json", "config", "show"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("settings file not found"));
}

// ============================================================================
// uploads
// ============================================================================

#[test]
fn uploads_feed_compose_overrides() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    let photo = dir.path().join("after.png");
    std::fs::write(&photo, png_bytes(2000, 1000)).unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "plain text, not an image").unwrap();
    let overrides = dir.path().join("overrides.json");

    let output = pm_report(dir.path())
        .args(["uploads", "--kind", "after", "--task", "PM-001", "--max-edge", "400"])
        .arg("--overrides-out")
        .arg(&overrides)
        .arg(&photo)
        .arg(&notes)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let result = stdout_json(&output);
    assert_eq!(result["accepted"], 1);
    assert_eq!(result["rejected"], 1);
    let files = result["files"].as_array().unwrap();
    assert_eq!(files[0]["status"], "accepted");
    assert_eq!(files[0]["width"], 400);
    assert_eq!(files[0]["height"], 200);
    assert_eq!(files[0]["resized"], true);
    assert_eq!(files[1]["status"], "rejected");
    assert_eq!(files[1]["error"]["code"], 31);
    assert_eq!(files[1]["error"]["detail"]["reason"], "unsupported_type");

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&overrides).unwrap()).unwrap();
    assert_eq!(saved["PM-001"].as_array().unwrap().len(), 1);
    assert_eq!(saved["PM-001"][0]["type"], "after");

    let output = pm_report(dir.path())
        .args(["compose", "--images", "--today", "2024-06-15"])
        .arg("--overrides")
        .arg(&overrides)
        .arg(&records)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let html = std::fs::read_to_string(
        dir.path()
            .join("preventive-maintenance-report-2024-06-15.html"),
    )
    .unwrap();
    assert!(html.contains("data:image/png;base64,"));
    assert!(!html.contains("/media/pm001_before.jpg"));
}

#[test]
fn uploads_all_rejected_is_input_error() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.jpg");
    std::fs::write(&empty, b"").unwrap();

    let output = pm_report(dir.path())
        .args(["uploads", "--kind", "before"])
        .arg(&empty)
        .arg(dir.path().join("missing.png"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(12));
    let result = stdout_json(&output);
    assert_eq!(result["status"], "ERR_INPUT");
    let files = result["files"].as_array().unwrap();
    assert_eq!(files[0]["error"]["code"], 30);
    assert_eq!(files[1]["error"]["code"], 42);
}

#[test]
fn overrides_out_requires_task() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("a.png");
    std::fs::write(&photo, png_bytes(10, 10)).unwrap();
    pm_report(dir.path())
        .args(["uploads", "--kind", "before", "--overrides-out", "o.json"])
        .arg(&photo)
        .assert()
        .code(10);
}
