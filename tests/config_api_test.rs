//! Integration tests for config module public API.

use kitbox::config::{
    load_merged_config, load_or_default, resolve_string, validate, validate_config,
    InterpolationContext, ProjectConfig,
};
use kitbox::install::CaseStyle;
use kitbox::registry::{CyclePolicy, VersionConflictPolicy};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".kitbox");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
    temp
}

#[test]
fn full_config_workflow() {
    let temp = project(&[(
        "config.yml",
        r#"
registries:
  "@acme":
    url: https://acme.dev/r/{name}.json
    headers:
      Authorization: "Bearer ${ACME_TOKEN}"
default_registries: ["@acme", "@builtin"]
aliases:
  components: src/components
  ui: src/components/ui
framework_config: tailwind.config.json
stylesheet: src/styles/globals.css
file_case: kebab
resolve:
  cycles: error
  version_conflicts: first-wins
package_manager: pnpm
"#,
    )]);

    let config = load_merged_config(temp.path()).unwrap();
    validate(&config).unwrap();

    assert_eq!(config.default_registries, vec!["@acme", "@builtin"]);
    assert_eq!(config.aliases.ui, "src/components/ui");
    assert_eq!(config.aliases.lib, "lib");
    assert_eq!(config.file_case, Some(CaseStyle::Kebab));
    assert_eq!(config.resolve.cycles, CyclePolicy::Error);
    assert_eq!(
        config.resolve.version_conflicts,
        VersionConflictPolicy::FirstWins
    );
    assert_eq!(
        config.stylesheet,
        Some(PathBuf::from("src/styles/globals.css"))
    );

    let ctx = InterpolationContext::new().with_env(HashMap::from([(
        "ACME_TOKEN".to_string(),
        "t0k3n".to_string(),
    )]));
    let header = resolve_string(&config.registries["@acme"].headers["Authorization"], &ctx).unwrap();
    assert_eq!(header, "Bearer t0k3n");
}

#[test]
fn local_override_is_merged() {
    let temp = project(&[
        (
            "config.yml",
            "registries:\n  \"@acme\": https://acme.dev/r\naliases:\n  ui: components/ui\n",
        ),
        (
            "config.local.yml",
            "registries:\n  \"@acme\": http://localhost:4000/r\naliases:\n  ui: src/ui\n",
        ),
    ]);

    let config = load_merged_config(temp.path()).unwrap();

    assert_eq!(config.registries["@acme"].url, "http://localhost:4000/r");
    assert_eq!(config.aliases.ui, "src/ui");
}

#[test]
fn missing_config_is_an_error_or_default() {
    let temp = TempDir::new().unwrap();
    assert!(load_merged_config(temp.path()).is_err());

    let config = load_or_default(temp.path()).unwrap();
    assert!(config.registries.is_empty());
}

#[test]
fn validation_collects_every_problem() {
    let config: ProjectConfig = serde_yaml::from_str(
        r#"
registries:
  acme: ftp://acme.dev/r
  "@builtin": https://example.com/r
default_registries: ["@nowhere"]
"#,
    )
    .unwrap();

    let rules: Vec<String> = validate_config(&config)
        .into_iter()
        .map(|e| e.rule)
        .collect();

    assert!(rules.contains(&"invalid-registry-name".to_string()));
    assert!(rules.contains(&"invalid-registry-url".to_string()));
    assert!(rules.contains(&"reserved-registry-name".to_string()));
    assert!(rules.contains(&"unknown-default-registry".to_string()));
}
