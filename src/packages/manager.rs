//! Package manager detection and invocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::Result;
use crate::packages::PackageSpec;

/// JavaScript package managers kitbox can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Detect the package manager from lockfiles in `project_root`.
    pub fn detect(project_root: &Path) -> Option<Self> {
        let exists = |name: &str| project_root.join(name).exists();

        if exists("yarn.lock") {
            Some(Self::Yarn)
        } else if exists("pnpm-lock.yaml") {
            Some(Self::Pnpm)
        } else if exists("bun.lockb") || exists("bun.lock") {
            Some(Self::Bun)
        } else if exists("package-lock.json") || exists("package.json") {
            Some(Self::Npm)
        } else {
            None
        }
    }

    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Arguments that add `packages` to the project.
    pub fn install_args(&self, packages: &[PackageSpec], dev: bool) -> Vec<String> {
        let mut args = vec![match self {
            Self::Npm => "install".to_string(),
            _ => "add".to_string(),
        }];
        if dev {
            args.push(match self {
                Self::Bun => "-d".to_string(),
                _ => "-D".to_string(),
            });
        }
        args.extend(packages.iter().map(ToString::to_string));
        args
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            "bun" => Ok(Self::Bun),
            other => Err(format!("unknown package manager '{}'", other)),
        }
    }
}

/// Outcome of a package installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// Every package was installed.
    Installed,
    /// There was nothing to install.
    NothingToInstall,
    /// The package manager failed or could not be started.
    Failed {
        command: String,
        exit_code: Option<i32>,
        message: String,
    },
}

impl InstallStatus {
    /// Check if the installation failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Installs package dependencies into a project.
pub trait PackageRunner {
    /// Install runtime and development dependencies.
    fn run_install(
        &self,
        dependencies: &[PackageSpec],
        dev_dependencies: &[PackageSpec],
    ) -> Result<InstallStatus>;
}

/// Runs the package manager as a child process in the project directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    manager: PackageManager,
    project_root: PathBuf,
}

impl CommandRunner {
    /// Create a runner for a specific package manager.
    pub fn new(manager: PackageManager, project_root: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            project_root: project_root.into(),
        }
    }

    /// Create a runner using the configured manager, else the detected one,
    /// else npm.
    pub fn for_project(configured: Option<PackageManager>, project_root: &Path) -> Self {
        let manager = configured
            .or_else(|| PackageManager::detect(project_root))
            .unwrap_or(PackageManager::Npm);
        Self::new(manager, project_root)
    }

    /// The package manager this runner invokes.
    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    fn run(&self, packages: &[PackageSpec], dev: bool) -> InstallStatus {
        let args = self.manager.install_args(packages, dev);
        let command = format!("{} {}", self.manager.program(), args.join(" "));
        info!("Running {}", command);

        let output = Command::new(self.manager.program())
            .args(&args)
            .current_dir(&self.project_root)
            .output();

        match output {
            Ok(output) if output.status.success() => InstallStatus::Installed,
            Ok(output) => InstallStatus::Failed {
                command,
                exit_code: output.status.code(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) => InstallStatus::Failed {
                command,
                exit_code: None,
                message: e.to_string(),
            },
        }
    }
}

impl PackageRunner for CommandRunner {
    fn run_install(
        &self,
        dependencies: &[PackageSpec],
        dev_dependencies: &[PackageSpec],
    ) -> Result<InstallStatus> {
        if dependencies.is_empty() && dev_dependencies.is_empty() {
            debug!("No packages to install");
            return Ok(InstallStatus::NothingToInstall);
        }

        for (packages, dev) in [(dependencies, false), (dev_dependencies, true)] {
            if packages.is_empty() {
                continue;
            }
            let status = self.run(packages, dev);
            if status.is_failure() {
                return Ok(status);
            }
        }

        Ok(InstallStatus::Installed)
    }
}
