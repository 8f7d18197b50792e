//! Add command implementation.
//!
//! The `kitbox add` command resolves items with their dependencies, writes
//! their files, merges their config fragments, and installs their packages.

use std::path::{Path, PathBuf};

use crate::cli::args::AddArgs;
use crate::error::Result;
use crate::install::{
    install_tree, ConfigOutcome, FileOutcome, InstallOptions, InstallSummary, ItemStatus,
};
use crate::packages::{CommandRunner, InstallStatus, PackageRunner};
use crate::registry::{resolve_tree, ResolutionContext, ResolvedTree};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::Project;

/// The add command implementation.
pub struct AddCommand {
    project_root: PathBuf,
    args: AddArgs,
    runner: Option<Box<dyn PackageRunner>>,
}

impl AddCommand {
    /// Create a new add command.
    pub fn new(project_root: &Path, args: AddArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            runner: None,
        }
    }

    /// Use `runner` instead of the detected package manager.
    pub fn with_runner(mut self, runner: Box<dyn PackageRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &AddArgs {
        &self.args
    }
}

impl Command for AddCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = Project::load(&self.project_root)?;
        let index = project.registry_index()?;
        let mut ctx = ResolutionContext::new(&index);

        ui.show_header(&format!("Adding {}", self.args.items.join(", ")));

        let tree = match resolve_tree(&self.args.items, &mut ctx, project.config.resolve) {
            Ok(tree) => tree,
            Err(e) if e.is_resolution_error() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };
        ui.message(&format!(
            "Resolved {} item(s) with {} fetch(es)",
            tree.items.len(),
            ctx.fetch_count()
        ));

        let options = InstallOptions {
            overwrite: self.args.overwrite,
            dry_run: self.args.dry_run,
            skip_packages: self.args.skip_install,
        };
        let detected;
        let runner: &dyn PackageRunner = match &self.runner {
            Some(runner) => runner.as_ref(),
            None => {
                detected = CommandRunner::for_project(project.config.package_manager, &project.root);
                &detected
            }
        };

        let summary = install_tree(&tree, &project.config, &project.root, options, runner);
        report(ui, &tree, &summary);

        if summary.has_failures() {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}

fn report(ui: &mut dyn UserInterface, tree: &ResolvedTree, summary: &InstallSummary) {
    let dry_run = summary.files.dry_run;
    let (create, update) = if dry_run {
        ("Would create", "Would update")
    } else {
        ("Created", "Updated")
    };

    for file in &summary.files.files {
        let path = file.path.display();
        match &file.outcome {
            FileOutcome::Written => ui.success(&format!("{} {}", create, path)),
            FileOutcome::Overwritten { .. } => {
                ui.success(&format!("{} {} (previous version kept as .bak)", update, path))
            }
            FileOutcome::OverwrittenUnprotected { reason } => {
                ui.warning(&format!("{} {} without a backup: {}", update, path, reason))
            }
            FileOutcome::Unchanged => ui.detail(&format!("{} is up to date", path)),
            FileOutcome::Skipped => ui.skipped(&format!(
                "Skipped {} (exists; use --overwrite to replace)",
                path
            )),
            FileOutcome::Failed { reason } => ui.error(&format!("{}: {}", path, reason)),
        }
    }

    for target in &summary.targets {
        let path = target.path.display();
        match &target.result {
            Ok(ConfigOutcome::Created) => ui.success(&format!("{} {}", create, path)),
            Ok(ConfigOutcome::Updated) => ui.success(&format!("{} {}", update, path)),
            Ok(ConfigOutcome::Unchanged) => ui.detail(&format!("{} is up to date", path)),
            Err(message) => ui.error(message),
        }
    }

    let packages: Vec<String> = summary
        .packages
        .dependencies
        .iter()
        .chain(&summary.packages.dev_dependencies)
        .map(ToString::to_string)
        .collect();
    match &summary.package_status {
        Some(InstallStatus::Installed) => {
            ui.success(&format!("Installed {} package(s)", packages.len()))
        }
        Some(InstallStatus::Failed {
            command, message, ..
        }) => ui.error(&format!("{} failed: {}", command, message)),
        Some(InstallStatus::NothingToInstall) => {}
        None if !packages.is_empty() => {
            ui.message(&format!("Packages to install: {}", packages.join(" ")))
        }
        None => {}
    }

    for (item, status) in &summary.items {
        match status {
            ItemStatus::Installed => ui.detail(&format!("{}: installed", item)),
            ItemStatus::SkippedExisting => ui.detail(&format!("{}: skipped existing files", item)),
            ItemStatus::Failed => ui.detail(&format!("{}: failed", item)),
        }
    }

    if !tree.env_vars.is_empty() {
        ui.show_hint(&format!(
            "Set these environment variables: {}",
            tree.env_vars.join(", ")
        ));
    }
    for doc in &tree.docs {
        ui.message(doc);
    }
}
