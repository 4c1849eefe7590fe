use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

/// Copies a fixture into a fresh temp dir so the CLI can overwrite it.
fn scratch_copy(name: &str) -> (tempfile::TempDir, PathBuf) {
    let fixture = repo_root().join("fixtures").join(name);
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join(name);
    fs::copy(&fixture, &path).expect("copy fixture");
    (tmp, path)
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn cli_strips_card_in_place() {
    let (_tmp, path) = scratch_copy("contribution-card.svg");

    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe)
        .arg(path.to_string_lossy().as_ref())
        .assert()
        .success();
    assert_eq!(
        stdout_of(assert.get_output()).trim_end(),
        format!("Successfully stripped {}", path.display())
    );

    let svg = fs::read_to_string(&path).expect("read output");
    assert!(svg.contains(r#"id="contrib-3d""#));
    for removed in ["radar-chart", "pie-chart", "stats-text", "1,234 contributions"] {
        assert!(!svg.contains(removed), "{removed} survived");
    }
    assert!(svg.contains(r#"height="630" viewBox="0 0 1280 630""#));
    assert!(svg.ends_with("</g>\n</svg>\n"));
}

#[test]
fn cli_injects_streak_badge() {
    let (_tmp, path) = scratch_copy("contribution-card.svg");

    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe)
        .args([
            "--preset",
            "reserve-top",
            "--streak",
            "42",
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();
    assert!(stdout_of(assert.get_output()).contains("(streak: 42)"));

    let svg = fs::read_to_string(&path).expect("read output");
    assert_eq!(svg.matches(">42</text>").count(), 1);
    assert_eq!(svg.matches(r#"class="streak-icon""#).count(), 1);
    assert!(svg.contains(r#"height="970" viewBox="0 -120 1280 970""#));
}

#[test]
fn cli_leaves_file_untouched_when_no_group_is_found() {
    let (_tmp, path) = scratch_copy("no-groups.svg");
    let before = fs::read(&path).expect("read input");

    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe)
        .args(["--streak", "3", path.to_string_lossy().as_ref()])
        .assert()
        .success();
    assert!(stdout_of(assert.get_output()).starts_with("Could not find top-level group 1"));
    assert_eq!(fs::read(&path).expect("read output"), before);

    let exe = assert_cmd::cargo_bin!("svgtrim");
    Command::new(exe)
        .args(["--strict", path.to_string_lossy().as_ref()])
        .assert()
        .code(1);
    assert_eq!(fs::read(&path).expect("read output"), before);
}

#[test]
fn cli_writes_to_stdout_without_touching_the_input() {
    let (_tmp, path) = scratch_copy("contribution-card.svg");
    let before = fs::read(&path).expect("read input");

    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe)
        .args([
            "--preset",
            "keep-two",
            "--locator",
            "verified",
            "--out",
            "-",
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();
    let svg = stdout_of(assert.get_output());
    assert!(svg.contains(r#"id="radar-chart""#));
    assert!(!svg.contains(r#"id="pie-chart""#));
    assert!(svg.ends_with("</svg>\n"));
    assert_eq!(fs::read(&path).expect("read output"), before);
}

#[test]
fn cli_applies_json_config_overrides() {
    let (tmp, path) = scratch_copy("contribution-card.svg");
    let config = tmp.path().join("svgtrim.json");
    fs::write(
        &config,
        r#"{ "sizing": { "height": 700 }, "badge": { "caption": "days in a row" } }"#,
    )
    .expect("write config");

    let exe = assert_cmd::cargo_bin!("svgtrim");
    Command::new(exe)
        .args([
            "--config",
            config.to_string_lossy().as_ref(),
            "--streak",
            "9",
            path.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&path).expect("read output");
    assert!(svg.contains(r#"height="700" viewBox="0 0 1280 700""#));
    assert!(svg.contains(">days in a row</text>"));
}

#[test]
fn cli_without_path_is_a_usage_error() {
    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe).args(["--streak", "5"]).assert().code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("USAGE:"));
}

#[test]
fn cli_help_prints_usage_and_succeeds() {
    let exe = assert_cmd::cargo_bin!("svgtrim");
    let assert = Command::new(exe).arg("--help").assert().success();
    assert!(stdout_of(assert.get_output()).contains("USAGE:"));
}
