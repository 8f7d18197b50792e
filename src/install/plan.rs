//! Install planning: where each file goes and what will happen to it.
//!
//! Planning reads the project but never writes to it.

use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::config::Aliases;
use crate::install::case::CaseStyle;
use crate::registry::item::ROOT_PREFIX;
use crate::registry::{ItemType, ResolvedFile};

/// Where a project keeps each kind of file.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Project root
    pub root: PathBuf,
    /// Output directories per file type
    pub aliases: Aliases,
}

impl ProjectLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, aliases: Aliases) -> Self {
        Self {
            root: root.into(),
            aliases,
        }
    }

    /// Alias directory for a file type, or `None` for files placed by path.
    pub fn alias_dir(&self, file_type: ItemType) -> Option<&str> {
        file_type.alias().and_then(|alias| self.aliases.get(alias))
    }
}

/// Planning switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Replace existing files that differ
    pub overwrite: bool,
    /// Case transform for file names placed through an alias
    pub file_case: Option<CaseStyle>,
}

/// What applying the plan will do to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Destination does not exist yet.
    Create,
    /// Destination exists with different content and will be replaced.
    Overwrite,
    /// Destination exists with different content and will be left alone.
    Skip,
    /// Destination already has exactly this content.
    Unchanged,
    /// Destination is not allowed.
    Reject { reason: String },
}

/// One file in a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    /// Canonical key of the item that supplied the file
    pub item: String,
    /// Path of the file inside the registry
    pub source: String,
    /// Destination relative to the project root
    pub relative: PathBuf,
    /// Absolute destination
    pub destination: PathBuf,
    /// Content to write
    pub content: String,
    /// Planned action
    pub action: PlannedAction,
}

/// Every file an install will touch, one entry per destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallPlan {
    /// Planned files in first-appearance order
    pub files: Vec<PlannedFile>,
}

impl InstallPlan {
    /// Check if the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compute destinations and actions for `files`.
///
/// Two files mapping to the same destination collapse into one entry; the
/// later file wins and the earlier position is kept.
pub fn plan_files(files: &[ResolvedFile], layout: &ProjectLayout, options: PlanOptions) -> InstallPlan {
    let mut planned: IndexMap<PathBuf, PlannedFile> = IndexMap::new();

    for file in files {
        let entry = match destination(file, layout, options.file_case) {
            Ok(relative) => {
                let absolute = layout.root.join(&relative);
                let action = action_for(&absolute, &file.content, options.overwrite);
                PlannedFile {
                    item: file.item.clone(),
                    source: file.path.clone(),
                    relative,
                    destination: absolute,
                    content: file.content.clone(),
                    action,
                }
            }
            Err(reason) => PlannedFile {
                item: file.item.clone(),
                source: file.path.clone(),
                relative: PathBuf::from(file.target.as_deref().unwrap_or(&file.path)),
                destination: layout.root.join(file.target.as_deref().unwrap_or(&file.path)),
                content: file.content.clone(),
                action: PlannedAction::Reject { reason },
            },
        };

        debug!("{} -> {} ({:?})", entry.source, entry.relative.display(), entry.action);
        planned.insert(entry.relative.clone(), entry);
    }

    InstallPlan {
        files: planned.into_values().collect(),
    }
}

/// Destination of a file relative to the project root.
fn destination(
    file: &ResolvedFile,
    layout: &ProjectLayout,
    case: Option<CaseStyle>,
) -> Result<PathBuf, String> {
    let relative = match &file.target {
        Some(target) => {
            let target = target.strip_prefix(ROOT_PREFIX).unwrap_or(target);
            PathBuf::from(target)
        }
        None => match layout.alias_dir(file.file_type) {
            Some(dir) => {
                let name = Path::new(&file.path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| format!("'{}' has no file name", file.path))?;
                let name = match case {
                    Some(style) => style.apply_to_file_name(name),
                    None => name.to_string(),
                };
                Path::new(dir).join(name)
            }
            None => PathBuf::from(&file.path),
        },
    };

    if relative.as_os_str().is_empty() {
        return Err(format!("'{}' has an empty destination", file.path));
    }
    if escapes_root(&relative) {
        return Err(format!(
            "'{}' would be written outside the project",
            relative.display()
        ));
    }

    Ok(relative)
}

fn escapes_root(path: &Path) -> bool {
    path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

fn action_for(destination: &Path, content: &str, overwrite: bool) -> PlannedAction {
    let reject = |what: String| PlannedAction::Reject {
        reason: format!("{} {}", destination.display(), what),
    };

    let metadata = match fs::symlink_metadata(destination) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return PlannedAction::Create,
        Err(e) => return reject(format!("cannot be inspected: {}", e)),
    };
    if metadata.file_type().is_symlink() {
        return reject("is a symlink".to_string());
    }
    if metadata.is_dir() {
        return reject("is a directory".to_string());
    }

    match fs::read(destination) {
        Ok(existing) if existing == content.as_bytes() => PlannedAction::Unchanged,
        Ok(_) if overwrite => PlannedAction::Overwrite,
        Ok(_) => PlannedAction::Skip,
        Err(e) => reject(format!("cannot be read: {}", e)),
    }
}
