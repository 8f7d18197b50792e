//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! the project's `.kitbox/` directory.

use crate::config::merger::merge_configs;
use crate::config::schema::ProjectConfig;
use crate::error::{KitboxError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".kitbox";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.kitbox/config.yml`)
/// 2. Local overrides (`.kitbox/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .kitbox/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .kitbox/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: Self::existing(project_root, "config.yml"),
            project_local: Self::existing(project_root, "config.local.yml"),
        }
    }

    fn existing(project_root: &Path, file: &str) -> Option<PathBuf> {
        let path = project_root.join(CONFIG_DIR).join(file);
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

/// Directory holding project-local registry items (`.kitbox/registry/`).
pub fn local_registry_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("registry")
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.kitbox` directory (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse YAML content into ProjectConfig.
///
/// `source_path` is only used for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProjectConfig> {
    serde_yaml::from_str(content).map_err(|e| KitboxError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KitboxError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            KitboxError::Io(e)
        }
    })?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| KitboxError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // An empty file parses as null; treat it as an empty mapping.
    if value.is_null() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }
    Ok(value)
}

/// Load and merge all config files for a project.
///
/// # Errors
///
/// Returns `ConfigNotFound` if no project config exists.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<ProjectConfig> {
    let paths = ConfigPaths::discover(project_root);

    if !paths.has_project_config() {
        return Err(KitboxError::ConfigNotFound {
            path: project_root.join(CONFIG_DIR).join("config.yml"),
        });
    }

    load_paths(&paths, project_root)
}

/// Load the merged config, or defaults when the project has none.
pub fn load_or_default(project_root: &Path) -> Result<ProjectConfig> {
    let paths = ConfigPaths::discover(project_root);
    if paths.all_existing().is_empty() {
        return Ok(ProjectConfig::default());
    }
    load_paths(&paths, project_root)
}

fn load_paths(paths: &ConfigPaths, project_root: &Path) -> Result<ProjectConfig> {
    let values = paths
        .all_existing()
        .into_iter()
        .map(|p| load_config_value(p))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_configs(&values);
    serde_yaml::from_value(merged).map_err(|e| KitboxError::ConfigParseError {
        path: project_root.join(CONFIG_DIR),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(root: &Path, file: &str, content: &str) {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn discover_finds_both_files() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "{}");
        write_config(temp.path(), "config.local.yml", "{}");

        let paths = ConfigPaths::discover(temp.path());

        assert!(paths.has_project_config());
        assert_eq!(paths.all_existing().len(), 2);
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();
        let nested = temp.path().join("src").join("components");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_falls_back_to_git() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        let nested = temp.path().join("app");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn local_overrides_project_config() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "config.yml",
            "stylesheet: app/globals.css\npackage_manager: npm",
        );
        write_config(temp.path(), "config.local.yml", "package_manager: bun");

        let config = load_merged_config(temp.path()).unwrap();

        assert_eq!(config.stylesheet, Some(PathBuf::from("app/globals.css")));
        assert_eq!(
            config.package_manager,
            Some(crate::packages::PackageManager::Bun)
        );
    }

    #[test]
    fn missing_config_is_not_found() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            load_merged_config(temp.path()),
            Err(KitboxError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn missing_config_defaults_when_optional() {
        let temp = TempDir::new().unwrap();
        let config = load_or_default(temp.path()).unwrap();
        assert!(config.registries.is_empty());
    }

    #[test]
    fn empty_file_is_empty_config() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "");
        assert!(load_merged_config(temp.path()).is_ok());
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "registries: [unclosed");
        assert!(matches!(
            load_merged_config(temp.path()),
            Err(KitboxError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "file_case: shouting");
        assert!(matches!(
            load_merged_config(temp.path()),
            Err(KitboxError::ConfigParseError { .. })
        ));
    }
}
