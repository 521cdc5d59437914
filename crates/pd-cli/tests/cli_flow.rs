//! End-to-end integration tests for the payout pipeline.
//!
//! Runs the built `pd` binary against tempdir-backed candidate files and
//! config, asserting on JSON output and exit codes.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn pd_binary() -> String {
    env!("CARGO_BIN_EXE_pd").to_string()
}

/// Runs `pd` with an isolated home so a developer's own config cannot leak
/// into the test.
fn pd_command(temp: &Path) -> Command {
    let mut cmd = Command::new(pd_binary());
    cmd.env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("PD_CAP_FRACTION")
        .env_remove("PD_POOL_BUCKET")
        .env_remove("PD_EXCLUDE_FLAGGED");
    cmd
}

fn write_candidates(temp: &Path, content: &str) -> PathBuf {
    let path = temp.join("candidates.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_split_json_uses_default_quarters() {
    let temp = TempDir::new().unwrap();

    let output = pd_command(temp.path())
        .args(["split", "--gross", "1000", "--json"])
        .output()
        .expect("failed to run pd split");
    assert!(
        output.status.success(),
        "pd split should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["gross"], 1000.0);
    let buckets = value["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 4);
    for bucket in buckets {
        assert_eq!(bucket["amount"], 250.0);
    }
}

#[test]
fn test_distribute_freeze_and_redistribute() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(
        temp.path(),
        r#"[{"id": "a", "weight": 90.0}, {"id": "b", "weight": 10.0}]"#,
    );

    let output = pd_command(temp.path())
        .args(["distribute", "--pool", "1000", "--cap", "0.5", "--json"])
        .arg("--candidates")
        .arg(&candidates)
        .output()
        .expect("failed to run pd distribute");
    assert!(
        output.status.success(),
        "pd distribute should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // a's tentative 900 freezes at the 500 cap; the rest flows to b.
    assert_eq!(value["payouts"]["a"], 500.0);
    assert_eq!(value["payouts"]["b"], 500.0);
    assert_eq!(value["total_distributed"], 1000.0);
    assert_eq!(value["residual"], 0.0);
}

#[test]
fn test_distribute_negative_weight_rejects_run() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(temp.path(), r#"[{"id": "a", "weight": -5.0}]"#);

    let output = pd_command(temp.path())
        .args(["distribute", "--pool", "1000", "--json"])
        .arg("--candidates")
        .arg(&candidates)
        .output()
        .expect("failed to run pd distribute");

    assert!(
        !output.status.success(),
        "negative weight must reject the whole run"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("negative weight"), "stderr: {stderr}");
    assert!(
        output.stdout.is_empty(),
        "no partial results on a rejected run"
    );
}

#[test]
fn test_distribute_exclude_flagged() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(
        temp.path(),
        r#"[{"id": "a", "weight": 50.0, "flagged": true}, {"id": "b", "weight": 50.0}]"#,
    );

    let output = pd_command(temp.path())
        .args([
            "distribute",
            "--pool",
            "100",
            "--exclude-flagged",
            "--json",
        ])
        .arg("--candidates")
        .arg(&candidates)
        .output()
        .expect("failed to run pd distribute");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["payouts"]["a"].is_null());
    assert_eq!(value["payouts"]["b"], 100.0);
    assert_eq!(value["eligible_weight_total"], 50.0);
}

#[test]
fn test_report_with_config_file() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(
        temp.path(),
        r#"[{"id": "a", "weight": 100.0}, {"id": "b", "weight": 100.0}, {"id": "c", "weight": 100.0}]"#,
    );

    let config_path = temp.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
pool_bucket = "holders"
cap_fraction = 0.02

[split]
agent = 0.25
platform = 0.25
creator = 0.25
holders = 0.25
"#,
    )
    .unwrap();

    let output = pd_command(temp.path())
        .args(["report", "--gross", "4000", "--json"])
        .arg("--candidates")
        .arg(&candidates)
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("failed to run pd report");
    assert!(
        output.status.success(),
        "pd report should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["pool_amount"], 1000.0);
    // Cap 0.02 freezes all three candidates at 20; 940 is left over.
    assert_eq!(value["distribution"]["payouts"]["a"], 20.0);
    assert_eq!(value["distribution"]["total_distributed"], 60.0);
    assert_eq!(value["residual"], 940.0);
}

#[test]
fn test_zero_pool_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(temp.path(), r#"[{"id": "a", "weight": 50.0}]"#);

    let output = pd_command(temp.path())
        .args(["distribute", "--pool", "0", "--json"])
        .arg("--candidates")
        .arg(&candidates)
        .output()
        .expect("failed to run pd distribute");
    assert!(output.status.success(), "zero pool is a valid run");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total_distributed"], 0.0);
    assert_eq!(value["eligible_weight_total"], 0.0);
    assert!(value["payouts"].as_object().unwrap().is_empty());
}

#[test]
fn test_identical_runs_produce_identical_payouts() {
    let temp = TempDir::new().unwrap();
    let candidates = write_candidates(
        temp.path(),
        r#"[{"id": "a", "weight": 17.3}, {"id": "b", "weight": 41.9}, {"id": "c", "weight": 88.8}]"#,
    );

    let run = || {
        let output = pd_command(temp.path())
            .args(["distribute", "--pool", "777.7", "--cap", "0.35", "--json"])
            .arg("--candidates")
            .arg(&candidates)
            .output()
            .expect("failed to run pd distribute");
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        value["payouts"].clone()
    };

    assert_eq!(run(), run());
}
