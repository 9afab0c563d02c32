//! Integration test: harness CLI and structured log
//!
//! Validates that:
//! 1. `format` prints the rendered bytes and appends a valid JSONL record.
//! 2. Bounded runs report truncation in the log.
//! 3. `divmod` rejects a zero divisor with a failing exit status.
//! 4. `parse` reports value, consumed length and status.
//!
//! Run: cargo test -p bootfmt-harness --test format_cli_test

use std::path::PathBuf;
use std::process::Command;

use bootfmt_harness::structured_log::{Outcome, validate_log_file};

fn harness() -> Command {
    Command::new(env!("CARGO_BIN_EXE_harness"))
}

/// Fresh log path; the harness appends, so any leftover file is removed.
fn temp_log(name: &str) -> PathBuf {
    let path =
        std::env::temp_dir().join(format!("bootfmt-{}-{name}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

// ---------------------------------------------------------------------------
// 1. format
// ---------------------------------------------------------------------------

#[test]
fn format_prints_output_and_logs() {
    let log = temp_log("format");
    let out = harness()
        .args(["format", "--format", "%s has %05d %c", "--log"])
        .arg(&log)
        .args(["s:disk", "i:-42", "c:!"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, b"disk has 00-42 !\n");

    let (lines, errors) = validate_log_file(&log).unwrap();
    assert_eq!(lines, 1);
    assert!(errors.is_empty(), "{errors:?}");

    let text = std::fs::read_to_string(&log).unwrap();
    let entry: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(entry["event"], "format");
    assert_eq!(entry["length"], 16);
    assert_eq!(entry["outcome"], "pass");
    let _ = std::fs::remove_file(&log);
}

#[test]
fn format_appends_to_existing_log() {
    let log = temp_log("append");
    for value in ["i:1", "i:2"] {
        let out = harness()
            .args(["format", "--format", "%d", "--log"])
            .arg(&log)
            .arg(value)
            .output()
            .unwrap();
        assert!(out.status.success());
    }
    let (lines, errors) = validate_log_file(&log).unwrap();
    assert_eq!(lines, 2);
    assert!(errors.is_empty(), "{errors:?}");
    let _ = std::fs::remove_file(&log);
}

#[test]
fn format_null_string_argument() {
    let log = temp_log("null");
    let out = harness()
        .args(["format", "--format", "[%s]", "--log"])
        .arg(&log)
        .arg("s:(null)")
        .output()
        .unwrap();
    assert_eq!(out.stdout, b"[(null)]\n");
    let _ = std::fs::remove_file(&log);
}

// ---------------------------------------------------------------------------
// 2. Bounded runs
// ---------------------------------------------------------------------------

#[test]
fn bounded_format_reports_truncation() {
    let log = temp_log("bounded");
    let out = harness()
        .args(["format", "--format", "%x%x", "--capacity", "4", "--log"])
        .arg(&log)
        .args(["u:0xabcd", "u:0xef"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, b"abc\n");
    assert!(String::from_utf8_lossy(&out.stderr).contains("truncated"));

    let text = std::fs::read_to_string(&log).unwrap();
    let entry = bootfmt_harness::structured_log::validate_log_line(text.trim(), 1).unwrap();
    assert_eq!(entry.outcome, Some(Outcome::Truncated));
    assert_eq!(entry.length, Some(6));
    assert_eq!(entry.capacity, Some(4));
    let _ = std::fs::remove_file(&log);
}

#[test]
fn bad_argument_spec_is_rejected() {
    let out = harness()
        .args(["format", "--format", "%d", "x:1"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown argument tag"));
}

// ---------------------------------------------------------------------------
// 3. divmod
// ---------------------------------------------------------------------------

#[test]
fn divmod_prints_report() {
    let out = harness().args(["divmod", "1000", "7"]).output().unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["quotient"], 142);
    assert_eq!(report["remainder"], 6);
}

#[test]
fn divmod_rejects_zero_divisor() {
    let out = harness().args(["divmod", "5", "0"]).output().unwrap();
    assert!(!out.status.success());
}

// ---------------------------------------------------------------------------
// 4. parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_report() {
    let out = harness().args(["parse", "0755", "--base", "0"]).output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["value"], 0o755);
    assert_eq!(report["consumed"], 4);
    assert_eq!(report["status"], "success");
}
