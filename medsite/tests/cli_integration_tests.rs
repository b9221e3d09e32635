// medsite/tests/cli_integration_tests.rs
//! End-to-end tests for the `medsite` binary. Each test works on its own
//! temporary data directory through `--data-dir`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn medsite(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("medsite"));
    cmd.env_remove("MEDSITE_DATA_DIR")
        .env_remove("MEDSITE_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn stored(data_dir: &Path) -> Value {
    let text = fs::read_to_string(data_dir.join("content.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn write_json(dir: &Path, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn show_seeds_and_prints_the_default_document() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Willkommen in unserer Praxis"))
        .stdout(predicate::str::contains("\"contact\""));

    assert!(dir.path().join("content.json").exists());
}

#[test]
fn show_section_prints_only_that_section() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args(["show", "--section", "contact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("info@praxis-example.de"))
        .stdout(predicate::str::contains("Willkommen").not());

    medsite(dir.path())
        .args(["show", "--section", "pricing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Section 'pricing' does not exist"));
}

#[test]
fn set_merges_form_fields_and_strips_scripts() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args([
            "set",
            "intro_title=Hallo <script>alert(1)</script>Welt",
            "contact_phone=+49 30 123",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved"));

    let content = stored(dir.path());
    assert_eq!(content["intro"]["title"], "Hallo Welt");
    assert_eq!(content["contact"]["phone"], "+49 30 123");
    assert_eq!(content["intro"]["subtitle"], "Hausärztliche Versorgung für die ganze Familie");
    assert_eq!(content["contact"]["email"], "info@praxis-example.de");
}

#[test]
fn set_with_invalid_email_is_rejected_and_leaves_the_file_alone() {
    let dir = TempDir::new().unwrap();
    medsite(dir.path()).arg("show").assert().success();
    let before = fs::read_to_string(dir.path().join("content.json")).unwrap();

    medsite(dir.path())
        .args(["set", "contact_email=not-an-email", "intro_title=Changed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Content update rejected"))
        .stderr(predicate::str::contains("Invalid contact email address"));

    let after = fs::read_to_string(dir.path().join("content.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn set_with_only_blank_fields_saves_nothing() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args(["set", "intro_title=   ", "csrf=token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to save"));
}

#[test]
fn set_image_with_bad_url_is_reset_with_a_warning() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args(["set", "--image", "intro_doctorImage=ftp://example.com/doc.jpg"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"))
        .stderr(predicate::str::contains("intro.doctorImage"));

    assert_eq!(stored(dir.path())["intro"]["doctorImage"], "images/placeholder.jpg");

    medsite(dir.path())
        .args(["set", "--image", "about_teamImage=images/team-2026.jpg"])
        .assert()
        .success();
    assert_eq!(stored(dir.path())["about"]["teamImage"], "images/team-2026.jpg");
}

#[test]
fn import_merges_and_replace_drops_missing_sections() {
    let dir = TempDir::new().unwrap();
    let partial = write_json(
        dir.path(),
        "partial.json",
        &json!({
            "about": { "text": "<iframe src=\"x\"></iframe>Neu im Team" },
            "bad key!": { "x": "y" }
        }),
    );

    medsite(dir.path())
        .args(["import", "-i"])
        .arg(&partial)
        .assert()
        .success();

    let content = stored(dir.path());
    assert_eq!(content["about"]["text"], "Neu im Team");
    assert_eq!(content["about"]["title"], "Über uns");
    assert_eq!(content["badkey"]["x"], "y");
    assert!(content.get("intro").is_some());

    let full = write_json(
        dir.path(),
        "full.json",
        &json!({ "intro": { "title": "Nur Intro" } }),
    );
    medsite(dir.path())
        .args(["import", "--replace", "-i"])
        .arg(&full)
        .assert()
        .success();

    let content = stored(dir.path());
    assert_eq!(content, json!({ "intro": { "title": "Nur Intro" } }));
}

#[test]
fn import_of_malformed_json_fails_before_touching_the_store() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();

    medsite(dir.path())
        .args(["import", "-i"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));

    assert!(!dir.path().join("content.json").exists());
}

#[test]
fn scan_reports_findings_as_table_and_json() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "scan.json",
        &json!({
            "intro": {
                "title": "<script>steal()</script>Hallo",
                "buttonText": "<a href=\"javascript:go()\">Los</a>"
            }
        }),
    );

    medsite(dir.path())
        .args(["scan", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("script_block"))
        .stdout(predicate::str::contains("javascript_uri"));

    let output = medsite(dir.path())
        .args(["scan", "--json", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_findings"], 2);
    let rules: Vec<&str> = report["findings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["rule_name"].as_str())
        .collect();
    assert!(rules.contains(&"script_block"));
    assert!(rules.contains(&"javascript_uri"));

    medsite(dir.path())
        .args(["scan", "--fail-over-threshold", "1", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceed the threshold of 1"));
}

#[test]
fn scan_of_the_default_document_is_clean() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args(["scan", "--fail-over-threshold", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to sanitize"));
}

#[test]
fn backup_create_list_and_restore() {
    let dir = TempDir::new().unwrap();

    let output = medsite(dir.path()).args(["backup", "create"]).output().unwrap();
    assert!(output.status.success());
    let name = String::from_utf8(output.stdout).unwrap().trim().to_string();
    assert!(name.starts_with("content-") && name.ends_with(".json"));

    medsite(dir.path())
        .args(["set", "intro_title=Zwischenstand"])
        .assert()
        .success()
        .stderr(predicate::str::contains("backed up as"));
    assert_eq!(stored(dir.path())["intro"]["title"], "Zwischenstand");

    medsite(dir.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(name.as_str()));

    medsite(dir.path())
        .args(["backup", "restore", name.as_str()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Restored"));
    assert_eq!(stored(dir.path())["intro"]["title"], "Willkommen in unserer Praxis");

    medsite(dir.path())
        .args(["backup", "restore", "../content.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn quiet_suppresses_informational_output() {
    let dir = TempDir::new().unwrap();

    medsite(dir.path())
        .args(["--quiet", "set", "intro_title=Leise"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
