//! View command implementation.
//!
//! The `kitbox view` command prints the resolved tree for a set of items as
//! JSON without installing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::ViewArgs;
use crate::error::{KitboxError, Result};
use crate::registry::{resolve_tree, ResolutionContext};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::project::Project;

/// The view command implementation.
pub struct ViewCommand {
    project_root: PathBuf,
    args: ViewArgs,
}

impl ViewCommand {
    /// Create a new view command.
    pub fn new(project_root: &Path, args: ViewArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for ViewCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = Project::load(&self.project_root)?;
        let index = project.registry_index()?;
        let mut ctx = ResolutionContext::new(&index);

        let tree = match resolve_tree(&self.args.items, &mut ctx, project.config.resolve) {
            Ok(tree) => tree,
            Err(e) if e.is_resolution_error() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        let json = serde_json::to_string_pretty(&tree).map_err(|e| KitboxError::Other(e.into()))?;
        ui.data(&json);

        Ok(CommandResult::success())
    }
}
