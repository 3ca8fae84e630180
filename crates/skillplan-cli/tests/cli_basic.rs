//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_skillplan"))
        .args(args)
        .env("SKILLPLAN_HOME", home)
        .env_remove("SKILLPLAN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn add_skill(home: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["skill", "add"];
    full.extend_from_slice(args);
    full.push("--json");
    let (code, stdout, stderr) = run_cli(home, &full);
    assert_eq!(code, 0, "skill add failed: {stderr}");
    serde_json::from_str(&stdout).expect("skill add --json is not JSON")
}

#[test]
fn test_skill_add_and_list() {
    let home = tempfile::tempdir().unwrap();
    let created = add_skill(home.path(), &["Rust", "--goal", "600", "--deadline", "+10"]);
    assert_eq!(created["name"], "Rust");
    assert_eq!(created["goal_minutes"], 600);

    let (code, stdout, _) = run_cli(home.path(), &["skill", "list", "--json"]);
    assert_eq!(code, 0);
    let skills: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let skills = skills.as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["id"], created["id"]);
}

#[test]
fn test_skill_add_plain_output() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["skill", "add", "Piano", "--goal", "120"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Skill created:"));
}

#[test]
fn test_plan_pace_json() {
    let home = tempfile::tempdir().unwrap();
    add_skill(home.path(), &["Rust", "--goal", "600", "--deadline", "+10"]);

    let (code, stdout, stderr) = run_cli(home.path(), &["plan", "pace", "Rust", "--json"]);
    assert_eq!(code, 0, "plan pace failed: {stderr}");
    let p: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(p["remaining_days"], 10);
    assert_eq!(p["units_per_day"], 60);
    assert_eq!(p["pomodoros_per_day"], 3);
    assert_eq!(p["is_expired"], false);
}

#[test]
fn test_plan_daily_json_sums_to_remaining() {
    let home = tempfile::tempdir().unwrap();
    add_skill(
        home.path(),
        &[
            "Guitar",
            "--goal",
            "1000",
            "--deadline",
            "+20",
            "--distribution",
            "exponential",
            "--intensity",
            "0.7",
        ],
    );

    let (code, stdout, stderr) = run_cli(home.path(), &["plan", "daily", "Guitar", "--json"]);
    assert_eq!(code, 0, "plan daily failed: {stderr}");
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let items = plan["items"].as_array().unwrap();
    let total: u64 = items.iter().map(|i| i["minutes"].as_u64().unwrap()).sum();
    assert_eq!(total, 1000);
    assert!(!plan["phases"].as_array().unwrap().is_empty());
}

#[test]
fn test_plan_daily_preview_does_not_save() {
    let home = tempfile::tempdir().unwrap();
    add_skill(home.path(), &["Go", "--goal", "300", "--deadline", "+14"]);

    let (code, stdout, _) = run_cli(
        home.path(),
        &["plan", "daily", "Go", "--off", "sat,sun", "--json"],
    );
    assert_eq!(code, 0);
    let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    for item in plan["items"].as_array().unwrap() {
        if item["is_excluded"] == true {
            assert_eq!(item["minutes"], 0);
        }
    }

    let (_, stdout, _) = run_cli(home.path(), &["skill", "show", "Go", "--json"]);
    let skill: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(skill["excluded_weekdays"].as_array().unwrap().len(), 0);
}

#[test]
fn test_plan_without_deadline() {
    let home = tempfile::tempdir().unwrap();
    add_skill(home.path(), &["Drawing", "--goal", "300"]);

    let (code, stdout, _) = run_cli(home.path(), &["plan", "pace", "Drawing"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no deadline"));

    let (code, stdout, _) = run_cli(home.path(), &["plan", "daily", "Drawing", "--json"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "null");
}

#[test]
fn test_skill_log_reduces_requirement() {
    let home = tempfile::tempdir().unwrap();
    add_skill(home.path(), &["Rust", "--goal", "600", "--deadline", "+10"]);

    let (code, _, stderr) = run_cli(home.path(), &["skill", "log", "Rust", "--minutes", "100"]);
    assert_eq!(code, 0, "skill log failed: {stderr}");

    let (_, stdout, _) = run_cli(home.path(), &["plan", "pace", "Rust", "--json"]);
    let p: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(p["units_per_day"], 50);

    let (code, stdout, _) = run_cli(home.path(), &["skill", "history", "Rust", "--json"]);
    assert_eq!(code, 0);
    let entries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[test]
fn test_skill_remove() {
    let home = tempfile::tempdir().unwrap();
    add_skill(home.path(), &["Temp", "--goal", "60"]);

    let (code, _, _) = run_cli(home.path(), &["skill", "remove", "Temp"]);
    assert_eq!(code, 0);

    let (code, _, stderr) = run_cli(home.path(), &["skill", "show", "Temp"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_invalid_intensity_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["skill", "add", "Bad", "--goal", "60", "--intensity", "1.5"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_far_relative_deadline_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        home.path(),
        &["skill", "add", "Far", "--goal", "10", "--deadline", "+99999999"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid relative deadline"));
}

#[test]
fn test_config_set_get() {
    let home = tempfile::tempdir().unwrap();

    let (code, _, _) = run_cli(home.path(), &["config", "set", "planner.max_steepness", "4.5"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "planner.max_steepness"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "4.5");

    let (code, stdout, _) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["planner"]["max_steepness"], 4.5);
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "nope.missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_defaults_apply_to_new_skills() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "defaults.distribution", "exponential"]);
    assert_eq!(code, 0);

    let created = add_skill(home.path(), &["Chess", "--goal", "200"]);
    assert_eq!(created["distribution"], "exponential");
}
