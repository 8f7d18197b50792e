//! Backup command implementation.
//!
//! `kitbox backup restore` puts `<path>.bak` back in place and
//! `kitbox backup discard` deletes it.

use std::path::{Path, PathBuf};

use crate::cli::args::{BackupAction, BackupArgs};
use crate::config::find_project_root;
use crate::error::Result;
use crate::install::{backup_path, delete_backup, restore_backup};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The backup command implementation.
pub struct BackupCommand {
    project_root: PathBuf,
    args: BackupArgs,
}

impl BackupCommand {
    /// Create a new backup command.
    pub fn new(project_root: &Path, args: BackupArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for BackupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = find_project_root(&self.project_root).unwrap_or_else(|| self.project_root.clone());

        let (paths, restore) = match &self.args.action {
            BackupAction::Restore { paths } => (paths, true),
            BackupAction::Discard { paths } => (paths, false),
        };

        let mut missing = 0;
        for path in paths {
            let absolute = root.join(path);
            let found = if restore {
                restore_backup(&absolute)?
            } else {
                delete_backup(&absolute)?
            };

            match (found, restore) {
                (true, true) => ui.success(&format!("Restored {}", path.display())),
                (true, false) => ui.success(&format!(
                    "Discarded {}",
                    backup_path(path).display()
                )),
                (false, _) => {
                    missing += 1;
                    ui.warning(&format!("No backup for {}", path.display()));
                }
            }
        }

        if missing > 0 {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
