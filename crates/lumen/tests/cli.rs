// SPDX-FileCopyrightText: 2026 Lumen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests that run the `lumen` binary against a temporary data
//! directory. Research stays disabled so nothing touches the network.

use std::path::Path;
use std::process::{Command, Output};

fn write_config(dir: &Path, permission_default: &str) -> std::path::PathBuf {
    let config = format!(
        r#"
[agent]
log_level = "warn"
verbose_trace = false

[storage]
data_dir = "{}"

[security]
noninteractive = true
permission_default = "{permission_default}"
"#,
        dir.display().to_string().replace('\\', "/")
    );
    let path = dir.join("lumen.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn lumen(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lumen"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn unanswered_question_persists_to_inbox() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "approve");

    let out = lumen(&config, &["ask", "What is the capital of Atlantis?"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("don't know"));
    assert!(dir.path().join("memory.db").exists());

    let out = lumen(&config, &["status", "--json"]);
    assert!(out.status.success());
    let status: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(status["persistent"], true);
    assert_eq!(
        status["inbox"][0],
        "question: What is the capital of Atlantis?"
    );
}

#[test]
fn denied_persistence_leaves_no_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "deny");

    let out = lumen(&config, &["ask", "thanks"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "Got it.");
    assert!(!dir.path().join("memory.db").exists());
}

#[test]
fn consolidate_reports_summary() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "approve");

    lumen(&config, &["ask", "hello"]);
    let out = lumen(&config, &["consolidate"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("events=1"));
}

#[test]
fn invalid_config_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lumen.toml");
    std::fs::write(&path, "[storage]\ndata_dri = \"/tmp\"\n").unwrap();

    let out = lumen(&path, &["status"]);
    assert!(!out.status.success());
}

#[test]
fn digest_summarizes_the_day() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "approve");

    lumen(&config, &["ask", "What is the capital of Atlantis?"]);
    let out = lumen(&config, &["digest"]);
    assert!(out.status.success());
    let digest = stdout(&out);
    assert!(digest.starts_with("Daily digest: chats=1; inbox=1"), "{digest}");
    assert!(digest.contains("question: What is the capital of Atlantis?"));
}

#[test]
fn environment_overrides_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "approve");

    let out = Command::new(env!("CARGO_BIN_EXE_lumen"))
        .arg("--config")
        .arg(&config)
        .args(["ask", "hello"])
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("LUMEN_STORAGE_DATA_DIR", elsewhere.path())
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(elsewhere.path().join("memory.db").exists());
    assert!(!dir.path().join("memory.db").exists());
}
