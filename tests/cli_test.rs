//! Integration tests for the kitbox binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let kitbox_dir = temp.path().join(".kitbox");
    fs::create_dir_all(&kitbox_dir).unwrap();
    fs::write(kitbox_dir.join("config.yml"), config).unwrap();
    temp
}

fn kitbox(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("kitbox"));
    cmd.current_dir(temp.path()).env("NO_COLOR", "1");
    cmd
}

const STYLED_CONFIG: &str = r#"
framework_config: tailwind.config.json
stylesheet: app/globals.css
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitbox"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("install components from registries"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitbox"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_add_requires_items() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("kitbox"));
    cmd.arg("add");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_add_installs_item_and_dependencies() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["add", "card", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created components/ui/button.tsx"))
        .stdout(predicate::str::contains("Packages to install:"));

    for file in [
        "lib/utils.ts",
        "components/ui/button.tsx",
        "components/ui/badge.tsx",
        "components/card.tsx",
    ] {
        assert!(temp.path().join(file).exists(), "{} was not created", file);
    }
    let css = fs::read_to_string(temp.path().join("app/globals.css"))?;
    assert!(css.contains("--card: 0 0% 100%;"));
    Ok(())
}

#[test]
fn cli_add_unknown_item_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["add", "does-not-exist", "--skip-install"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Item not found"));

    assert!(!temp.path().join("components").exists());
    Ok(())
}

#[test]
fn cli_add_unknown_registry_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["add", "@nowhere/button", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown registry '@nowhere'"));
    Ok(())
}

#[test]
fn cli_add_dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["add", "button", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create components/ui/button.tsx"));

    assert!(!temp.path().join("components").exists());
    assert!(!temp.path().join("app/globals.css").exists());
    Ok(())
}

#[test]
fn cli_add_skips_existing_then_overwrites_and_restores() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    let button = temp.path().join("components/ui/button.tsx");
    fs::create_dir_all(button.parent().unwrap())?;
    fs::write(&button, "// local edits\n")?;

    kitbox(&temp)
        .args(["add", "button", "--skip-install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--overwrite"));
    assert_eq!(fs::read_to_string(&button)?, "// local edits\n");

    kitbox(&temp)
        .args(["add", "button", "--overwrite", "--skip-install"])
        .assert()
        .success();
    assert_ne!(fs::read_to_string(&button)?, "// local edits\n");
    assert!(temp.path().join("components/ui/button.tsx.bak").exists());

    kitbox(&temp)
        .args(["backup", "restore", "components/ui/button.tsx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored"));
    assert_eq!(fs::read_to_string(&button)?, "// local edits\n");
    Ok(())
}

#[test]
fn cli_backup_restore_without_backup_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["backup", "restore", "components/ui/ghost.tsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No backup"));
    Ok(())
}

#[test]
fn cli_view_prints_tree_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    let output = kitbox(&temp).args(["view", "card"]).output()?;
    assert!(output.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        tree["items"],
        serde_json::json!([
            "@builtin/utils",
            "@builtin/button",
            "@builtin/badge",
            "@builtin/card"
        ])
    );
    assert!(tree["cssVars"]["light"]["card"].is_string());
    Ok(())
}

#[test]
fn cli_schema_prints_json_schema() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    let output = kitbox(&temp).arg("schema").output()?;
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(schema["properties"]["registryDependencies"].is_object());
    Ok(())
}

#[test]
fn cli_generates_completions() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    kitbox(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kitbox"));
    Ok(())
}

#[test]
fn cli_rejects_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("registries:\n  acme: ftp://acme.dev/r\n");
    kitbox(&temp)
        .args(["add", "button", "--skip-install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid configuration"));
    Ok(())
}

#[test]
fn cli_project_flag_overrides_cwd() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STYLED_CONFIG);
    let elsewhere = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("kitbox"));
    cmd.current_dir(elsewhere.path())
        .env("NO_COLOR", "1")
        .arg("--project")
        .arg(temp.path())
        .args(["add", "utils", "--skip-install"]);
    cmd.assert().success();

    assert!(temp.path().join("lib/utils.ts").exists());
    assert!(!elsewhere.path().join("lib").exists());
    Ok(())
}
