//! Installing a resolved tree into a project.
//!
//! Installation runs in stages, each reported separately:
//! 1. Files are planned ([`plan`]) and written ([`apply`]), with backups
//!    for anything overwritten ([`backup`])
//! 2. The framework config file and global stylesheet receive the tree's
//!    merged fragments ([`framework`], [`stylesheet`])
//! 3. Package dependencies are handed to a [`PackageRunner`]
//!
//! Failures in one stage or one file do not stop the others.

pub mod apply;
pub mod backup;
pub mod case;
pub mod framework;
pub mod plan;
pub mod stylesheet;

pub use apply::{apply_plan, preview, FileOutcome, FileReport, InstallReport, ItemStatus};
pub use backup::{backup_path, create_backup, delete_backup, restore_backup, BACKUP_SUFFIX};
pub use case::CaseStyle;
pub use framework::{apply_framework_config, ConfigOutcome};
pub use plan::{plan_files, InstallPlan, PlanOptions, PlannedAction, PlannedFile, ProjectLayout};
pub use stylesheet::{apply_css_vars, update_stylesheet};

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::packages::{aggregate_dependencies, InstallStatus, PackageRunner, PackageSet};
use crate::registry::ResolvedTree;

/// Switches for [`install_tree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Replace existing files that differ
    pub overwrite: bool,
    /// Report without writing anything
    pub dry_run: bool,
    /// Do not run the package manager
    pub skip_packages: bool,
}

/// Outcome for one project config target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    /// Target path relative to the project root
    pub path: PathBuf,
    /// What happened, or why the merge failed
    pub result: std::result::Result<ConfigOutcome, String>,
}

/// Everything an install did.
#[derive(Debug, Clone)]
pub struct InstallSummary {
    /// Status per item, in resolution order
    pub items: Vec<(String, ItemStatus)>,
    /// Per-file outcomes
    pub files: InstallReport,
    /// Framework config and stylesheet outcomes
    pub targets: Vec<TargetReport>,
    /// Packages the tree needs
    pub packages: PackageSet,
    /// Package manager outcome, `None` when not run
    pub package_status: Option<InstallStatus>,
}

impl InstallSummary {
    /// Whether any file, target, or package step failed.
    pub fn has_failures(&self) -> bool {
        self.files.has_failures()
            || self.targets.iter().any(|t| t.result.is_err())
            || self
                .package_status
                .as_ref()
                .is_some_and(InstallStatus::is_failure)
    }
}

/// Install `tree` into the project at `project_root`.
pub fn install_tree(
    tree: &ResolvedTree,
    config: &ProjectConfig,
    project_root: &Path,
    options: InstallOptions,
    runner: &dyn PackageRunner,
) -> InstallSummary {
    let layout = ProjectLayout::new(project_root, config.aliases.clone());
    let plan = plan_files(
        &tree.files,
        &layout,
        PlanOptions {
            overwrite: options.overwrite,
            file_case: config.file_case,
        },
    );

    let files = if options.dry_run {
        preview(&plan)
    } else {
        apply_plan(&plan)
    };
    info!(
        "{} file(s) written, {} skipped, {} failed",
        files.written().count(),
        files.skipped().count(),
        files.failed().count()
    );

    let targets = apply_targets(tree, config, project_root, options.dry_run);

    let packages = aggregate_dependencies(tree);
    let package_status = if options.dry_run || options.skip_packages {
        None
    } else {
        Some(
            packages
                .install(runner)
                .unwrap_or_else(|e| InstallStatus::Failed {
                    command: "package install".to_string(),
                    exit_code: None,
                    message: e.to_string(),
                }),
        )
    };

    InstallSummary {
        items: files.item_statuses(&tree.items),
        files,
        targets,
        packages,
        package_status,
    }
}

fn apply_targets(
    tree: &ResolvedTree,
    config: &ProjectConfig,
    project_root: &Path,
    dry_run: bool,
) -> Vec<TargetReport> {
    let mut targets = Vec::new();

    if tree.has_framework_config() {
        match &config.framework_config {
            Some(path) => targets.push(TargetReport {
                path: path.clone(),
                result: apply_framework_config(&project_root.join(path), &tree.tailwind, dry_run)
                    .map_err(|e| e.to_string()),
            }),
            None => warn!("Items carry framework config but no framework_config is set"),
        }
    }

    if !tree.css_vars.is_empty() {
        match &config.stylesheet {
            Some(path) => targets.push(TargetReport {
                path: path.clone(),
                result: apply_css_vars(&project_root.join(path), &tree.css_vars, dry_run)
                    .map_err(|e| e.to_string()),
            }),
            None => warn!("Items carry CSS variables but no stylesheet is set"),
        }
    }

    for target in &targets {
        if let Err(e) = &target.result {
            warn!("{}", e);
        }
    }

    targets
}
