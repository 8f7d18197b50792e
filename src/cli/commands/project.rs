//! Project discovery shared by commands.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{find_project_root, load_or_default, validate, InterpolationContext, ProjectConfig};
use crate::error::Result;
use crate::registry::{build_index, RegistryIndex};

/// A project root and its validated configuration.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory holding `.kitbox/` (or `.git/`), else the start directory
    pub root: PathBuf,
    /// Merged configuration
    pub config: ProjectConfig,
}

impl Project {
    /// Find the project containing `start` and load its configuration.
    ///
    /// A project without `.kitbox/config.yml` uses the defaults.
    pub fn load(start: &Path) -> Result<Self> {
        let root = find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        debug!("Project root: {}", root.display());

        let config = load_or_default(&root)?;
        validate(&config)?;

        Ok(Self { root, config })
    }

    /// Build the registry index, expanding `${VAR}` from the process environment.
    pub fn registry_index(&self) -> Result<RegistryIndex> {
        build_index(
            &self.config,
            &self.root,
            &InterpolationContext::from_system_env(),
        )
    }
}
