//! Integration tests that run the CLI binary.

use std::path::PathBuf;

fn bin() -> std::process::Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_doc", "-", "assistant"));
    let mut cmd = std::process::Command::new(bin);
    cmd.env_remove("DOC_ASSISTANT_TOKEN");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name)
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = bin()
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ask"), "expected subcommands in usage text");
    assert!(stdout.contains("replay"));
}

#[test]
fn cli_version_succeeds() {
    let output = bin()
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("doc-assistant"));
}

#[test]
fn cli_ask_without_token_exits_with_error() {
    // Run from temp dir so dotenv() won't load .env from project root
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .args(["ask", "--no-stream", "-p", "hello"])
        .current_dir(tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        !output.status.success(),
        "expected failure when DOC_ASSISTANT_TOKEN is not set"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("DOC_ASSISTANT_TOKEN"),
        "expected token error message, got: {}",
        stderr
    );
}

#[test]
fn cli_format_rebuilds_recorded_answer() {
    let output = bin()
        .arg("format")
        .arg(demo("answer.txt"))
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Summary:\n"));
    assert!(stdout.contains("  \u{2022} Meetings move to Thursday"));
    assert!(stdout.contains("  \u{2022} Notes shared the same day"));
    assert!(!stdout.contains("trailing data"));
    assert!(!stdout.contains("**"));
}

#[test]
fn cli_format_json_lists_ops() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let path = tmp.path().join("raw.txt");
    std::fs::write(&path, "Findings:\\n- one\\n- two<Response>").unwrap();

    let output = bin()
        .arg("format")
        .arg(&path)
        .arg("--json")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let ops: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ops = ops.as_array().unwrap();
    assert_eq!(ops.len(), 4);
    assert_eq!(ops[0]["op"], "heading");
    assert_eq!(ops[1]["op"], "separator");
    assert_eq!(ops[2]["op"], "list_item");
}

#[test]
fn cli_replay_handles_split_terminator() {
    let output = bin()
        .arg("replay")
        .arg(demo("session.json"))
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "Structure Review:\n\n  \u{2022} Title present\n  \u{2022} Sections numbered\n\nThe document follows the expected outline."
    );
}

#[test]
fn cli_replay_of_empty_abnormal_close_fails() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let path = tmp.path().join("events.json");
    std::fs::write(
        &path,
        r#"[{"event":"opened"},{"event":"closed","code":1011,"reason":"server error"}]"#,
    )
    .unwrap();

    let output = bin()
        .arg("replay")
        .arg(&path)
        .output()
        .expect("binary not found - run cargo build first");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1011"), "got: {}", stderr);
}

#[test]
fn cli_preview_plain_strips_markdown() {
    let output = bin()
        .arg("preview")
        .arg(demo("answer.md"))
        .arg("--plain")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Quarterly Review"));
    assert!(stdout.contains("Revenue grew 12% on the back of the enterprise tier."));
    assert!(stdout.contains("\u{2022} Churn fell to 3%"));
    assert!(stdout.contains("Ship the roadmap"));
}

#[test]
fn cli_preview_styled_output_when_piped() {
    let output = bin()
        .arg("preview")
        .arg(demo("answer.md"))
        .args(["--width", "40"])
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Piped output carries no escape codes.
    assert!(!stdout.contains('\u{1b}'));
    assert!(stdout.contains("\u{2022} Churn fell to 3%"));
    assert!(stdout.contains("\u{250C}\u{2500} text"));
}

#[test]
fn cli_config_redacts_token() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .arg("config")
        .env("DOC_ASSISTANT_TOKEN", "super-secret")
        .current_dir(tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Token:"));
    assert!(!stdout.contains("super-secret"));
}
