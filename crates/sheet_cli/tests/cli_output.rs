use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_path(name: &str) -> String {
    workspace_root()
        .join(format!("tests/fixtures/{name}.json"))
        .to_string_lossy()
        .to_string()
}

fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn run_cli_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pf2e-sheet"))
        .current_dir(dir)
        .env_remove("PF2E_SHEET_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run pf2e-sheet CLI")
}

#[test]
fn cli_writes_sheet_into_default_output_dir() {
    let dir = temp_dir("pf2e_sheet_default");
    let fixture = fixture_path("valeros");
    let output = run_cli_in(&dir, &[&fixture]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let sheet = dir.join("output").join("valeros_sheet.html");
    let html = fs::read_to_string(&sheet).expect("sheet should be written");
    assert!(html.starts_with("<!doctype html>"));
    assert_eq!(html.matches("<section class=\"page\">").count(), 5);
    assert!(html.contains("<title>Valeros - Character Sheet</title>"));
    assert!(html.contains("Generated "));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valeros_sheet.html"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_honors_output_dir_and_title() {
    let dir = temp_dir("pf2e_sheet_outdir");
    let fixture = fixture_path("ezren");
    let output = run_cli_in(
        &dir,
        &[&fixture, "--output-dir", "sheets", "--title", "Ezren & Co"],
    );
    assert!(output.status.success());

    let html = fs::read_to_string(dir.join("sheets").join("ezren_sheet.html"))
        .expect("sheet should be written");
    assert!(html.contains("<title>Ezren &amp; Co</title>"));
    assert!(html.contains("Arcane Prepared Spells (arcane) — prepared"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_prints_sheet_to_stdout() {
    let dir = temp_dir("pf2e_sheet_stdout");
    let fixture = fixture_path("blank");
    let output = run_cli_in(&dir, &[&fixture, "--stdout"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<!doctype html>"));
    assert!(stdout.contains("<div class=\"title\">Blank</div>"));
    assert!(!dir.join("output").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_json_reports_derived_statistics() {
    let dir = temp_dir("pf2e_sheet_json");
    let fixture = fixture_path("valeros");
    let output = run_cli_in(&dir, &[&fixture, "--json"]);
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["name"], "Valeros");
    assert_eq!(json["level"], 5);
    assert_eq!(json["armor_class"]["total"], 25);
    assert_eq!(json["perception"]["total"], 14);
    assert_eq!(json["saves"][0]["total"], 13);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_disable_flag_removes_pages() {
    let dir = temp_dir("pf2e_sheet_disable");
    let fixture = fixture_path("valeros");
    let output = run_cli_in(
        &dir,
        &[&fixture, "--stdout", "--disable", "spells", "--disable", "info"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("<section class=\"page\">").count(), 3);
    assert!(!stdout.contains("Character Information"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_reads_config_from_flag_and_environment() {
    let dir = temp_dir("pf2e_sheet_config");
    let config = dir.join("toggles.json");
    fs::write(
        &config,
        r#"{ "sections": { "talents_equipment": false, "spells": { "enabled": false } } }"#,
    )
    .expect("failed to write config");
    let fixture = fixture_path("valeros");
    let config_arg = config.to_string_lossy().to_string();

    let output = run_cli_in(&dir, &[&fixture, "--stdout", "--config", &config_arg]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("<section class=\"page\">").count(), 2);

    let output = Command::new(env!("CARGO_BIN_EXE_pf2e-sheet"))
        .current_dir(&dir)
        .env("PF2E_SHEET_CONFIG", &config)
        .args([fixture.as_str(), "--stdout"])
        .output()
        .expect("failed to run pf2e-sheet CLI");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("<section class=\"page\">").count(), 2);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_save_config_persists_effective_toggles() {
    let dir = temp_dir("pf2e_sheet_save");
    let fixture = fixture_path("blank");
    let output = run_cli_in(
        &dir,
        &[&fixture, "--stdout", "--disable", "summary.skills", "--save-config"],
    );
    assert!(output.status.success());

    let saved = fs::read_to_string(dir.join("output").join("config.json"))
        .expect("config should be saved");
    let saved: Value = serde_json::from_str(&saved).expect("saved config should be JSON");
    assert_eq!(saved["sections"]["summary.skills"], false);
    assert_eq!(saved["sections"]["summary"], true);

    // The saved default-path config applies to the next run.
    let output = run_cli_in(&dir, &[&fixture, "--stdout"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("<h3>Skills</h3>"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_rejects_record_without_name() {
    let dir = temp_dir("pf2e_sheet_noname");
    let record = dir.join("nameless.json");
    fs::write(&record, r#"{ "system": {}, "items": [] }"#).expect("failed to write record");
    let record_arg = record.to_string_lossy().to_string();

    let output = run_cli_in(&dir, &[&record_arg]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("InvalidRecord"));
    assert!(!dir.join("output").join("nameless_sheet.html").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_rejects_malformed_json_and_missing_files() {
    let dir = temp_dir("pf2e_sheet_bad");
    let record = dir.join("broken.json");
    fs::write(&record, "{ not json").expect("failed to write record");
    let record_arg = record.to_string_lossy().to_string();

    let output = run_cli_in(&dir, &[&record_arg]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Parse"));

    let output = run_cli_in(&dir, &["does-not-exist.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Io"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cli_rejects_unknown_section_name() {
    let dir = temp_dir("pf2e_sheet_badsection");
    let fixture = fixture_path("blank");
    let output = run_cli_in(&dir, &[&fixture, "--disable", "portrait"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown section"));

    let _ = fs::remove_dir_all(&dir);
}
