//! End-to-end tests for the claude-usage binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveTime, TimeZone};
use predicates::prelude::*;
use serde_json::Value;


fn write_transcript(root: &Path, project: &str, name: &str, lines: &[String]) {
    let dir = root.join(project);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), lines.join("\n")).unwrap();
}


fn prompt(ts: &str, text: &str) -> String {
    format!(
        r#"{{"type":"user","timestamp":"{ts}","userType":"external","isMeta":false,"message":{{"role":"user","content":"{text}"}}}}"#
    )
}


fn response(ts: &str, model: &str) -> String {
    format!(
        r#"{{"type":"assistant","timestamp":"{ts}","message":{{"role":"assistant","model":"{model}","content":[{{"type":"text","text":"ok"}}]}}}}"#
    )
}


/// Monday midnight, local time, of the week containing `at`.
fn week_start(at: DateTime<Local>) -> DateTime<Local> {
    let monday = at.date_naive() - Days::new(u64::from(at.weekday().num_days_from_monday()));
    Local
        .from_local_datetime(&monday.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or(at)
}


/// A recent session start that stays inside the week the binary will see.
fn session_start() -> DateTime<Local> {
    let now = Local::now();
    let upcoming = week_start(now + Duration::minutes(5));
    if upcoming > now {
        upcoming
    } else {
        (now - Duration::minutes(3)).max(week_start(now))
    }
}


fn cmd(projects: &Path) -> Command {
    let mut cmd = Command::cargo_bin("claude-usage").unwrap();
    cmd.env_remove("CLAUDE_PROJECT_DIR")
        .env_remove("CLAUDE_USAGE_FILE")
        .env_remove("CLAUDE_MODEL")
        .env("NO_COLOR", "1")
        .arg("--projects-dir")
        .arg(projects);
    cmd
}


#[test]
fn test_help() {
    Command::cargo_bin("claude-usage")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("context"));
}


#[test]
fn test_update_writes_summary() {
    let tmp = tempfile::tempdir().unwrap();
    let projects = tmp.path().join("projects");
    let output = tmp.path().join("usage").join("usage_data.json");

    let started = session_start();
    let start = started.to_rfc3339();
    let end = (started + Duration::minutes(2)).to_rfc3339();
    write_transcript(
        &projects,
        "-work-app",
        "session.jsonl",
        &[
            prompt(&start, "write a parser"),
            prompt(&start, "<command-name>/clear</command-name>"),
            "{broken".to_string(),
            response(&end, "claude-sonnet-4-20250514"),
        ],
    );

    cmd(&projects)
        .arg("update")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("THIS WEEK"));

    let raw: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(raw["current_week"]["total_sessions"], 1);
    assert!(raw["current_week"]["sonnet4_hours"].as_f64().unwrap() > 0.0);
    assert_eq!(raw["current_week"]["opus4_hours"], 0.0);
    assert!(raw["current_5h_cycle"]["start_time"].is_i64());
    assert!(raw["last_updated"].is_i64());
}


#[test]
fn test_context_unavailable_for_empty_store() {
    let tmp = tempfile::tempdir().unwrap();

    cmd(tmp.path())
        .arg("context")
        .arg("--project")
        .arg("/work/app")
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable"));
}


#[test]
fn test_context_estimate_for_project() {
    let tmp = tempfile::tempdir().unwrap();
    let text = "a".repeat(4_000);
    write_transcript(
        tmp.path(),
        "-work-app",
        "s.jsonl",
        &[prompt("2024-01-15T10:00:00Z", &text)],
    );

    cmd(tmp.path())
        .arg("context")
        .arg("--project")
        .arg("/work/app")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""estimated_tokens": 1000"#))
        .stdout(predicate::str::contains(r#""context_limit": 200000"#));
}


#[test]
fn test_status_line_from_payload() {
    let tmp = tempfile::tempdir().unwrap();
    let payload = r#"{"model":{"id":"claude-opus-4-5","display_name":"Opus"},
        "context_window":{"used_percentage":20,"context_window_size":200000}}"#;

    cmd(tmp.path())
        .arg("--project")
        .arg("/work/my-app")
        .write_stdin(payload)
        .assert()
        .success()
        .stdout(predicate::str::contains("📁 my-app | 🤖 Opus 4.5 | "))
        .stdout(predicate::str::contains("📊 CTX:20% (40k/200k)"));
}


#[test]
fn test_status_line_tolerates_garbage_stdin() {
    let tmp = tempfile::tempdir().unwrap();

    cmd(tmp.path())
        .arg("status")
        .arg("--project")
        .arg("/work/app")
        .write_stdin("not json")
        .assert()
        .success()
        .stdout(predicate::str::diff("📁 app | 🤖 Sonnet 4\n"));
}
