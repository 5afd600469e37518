//! Integration tests for the sonicmind CLI binary.
//!
//! Each test writes an offline config: keyword classifier, no speech output,
//! dry-run actions and no microphone.

use std::path::PathBuf;
use std::process::Command;

fn write_config(name: &str) -> PathBuf {
    let temp_dir = std::env::temp_dir().join(format!("sonicmind-test-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&temp_dir).unwrap();
    let config_path = temp_dir.join("config.toml");
    std::fs::write(
        &config_path,
        r#"
[classifier]
backend = "keyword"

[voice]
listen_enabled = false
tts_engine = "none"

[actions]
dry_run = true
direct_play = false
"#,
    )
    .unwrap();
    config_path
}

fn sonicmind_cmd(name: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sonicmind"));
    cmd.arg("--config").arg(write_config(name));
    cmd
}

fn run(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !output.status.success() {
        panic!(
            "Command failed with status {:?}\nstdout: {stdout}\nstderr: {stderr}",
            output.status
        );
    }
    stdout
}

#[test]
fn run_play_command() {
    let out = run(sonicmind_cmd("play").args(["run", "--text", "play despacito"]));
    assert!(out.contains("You typed: play despacito"), "Got: {out}");
    assert!(out.contains("Detected Intent: play_music"), "Got: {out}");
    assert!(out.contains("[ok] Playing despacito on YouTube..."), "Got: {out}");
}

#[test]
fn run_search_command() {
    let out = run(sonicmind_cmd("search").args(["run", "--text", "search python tutorials"]));
    assert!(out.contains("Detected Intent: search_web"), "Got: {out}");
    assert!(out.contains("Searching Google for python tutorials..."), "Got: {out}");
}

#[test]
fn run_play_without_song_warns() {
    let out = run(sonicmind_cmd("nosong").args(["run", "--text", "play"]));
    assert!(
        out.contains("[warning] Please specify which song you want to play."),
        "Got: {out}"
    );
}

#[test]
fn run_blank_text_asks_for_command() {
    let out = run(sonicmind_cmd("blank").args(["run", "--text", "   "]));
    assert!(out.contains("Please type a command first!"), "Got: {out}");
    assert!(!out.contains("You typed"), "Got: {out}");
}

#[test]
fn run_json_output() {
    let out = run(sonicmind_cmd("json").args(["run", "--text", "hello", "--json"]));
    let result: serde_json::Value = serde_json::from_str(&out).expect("stdout should be JSON");
    assert_eq!(result["intent"], "greeting");
    assert_eq!(result["status"], "success");
    assert_eq!(result["message"], "Hello! How can I help you today?");
}

#[test]
fn speak_without_microphone_reports_error() {
    let out = run(sonicmind_cmd("speak").args(["speak", "--json"]));
    let result: serde_json::Value = serde_json::from_str(&out).expect("stdout should be JSON");
    assert_eq!(result["status"], "error");
    assert_eq!(result["message"], "Speech recognition service unavailable.");
}

#[test]
fn classify_prints_ranked_labels() {
    let out = run(sonicmind_cmd("classify").args(["classify", "--text", "tell me a joke"]));
    let first = out.lines().next().unwrap_or_default();
    assert!(first.starts_with("tell_joke"), "Got: {out}");
    assert!(out.contains("Intent: tell_joke"), "Got: {out}");
}
