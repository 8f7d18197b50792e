//! Applying an install plan.
//!
//! Writes are sequential and not transactional: a failure on one file is
//! recorded and the remaining files are still attempted.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::install::backup::{backup_path, create_backup};
use crate::install::plan::{InstallPlan, PlannedAction, PlannedFile};

/// What happened to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// New file written.
    Written,
    /// Existing file backed up, then replaced.
    Overwritten { backup: PathBuf },
    /// Existing file replaced, but the backup could not be made.
    OverwrittenUnprotected { reason: String },
    /// Existing file already had this content.
    Unchanged,
    /// Existing file differs and overwriting was not allowed.
    Skipped,
    /// Nothing was written.
    Failed { reason: String },
}

impl FileOutcome {
    /// Whether new content reached the destination.
    pub fn is_written(&self) -> bool {
        matches!(
            self,
            Self::Written | Self::Overwritten { .. } | Self::OverwrittenUnprotected { .. }
        )
    }
}

/// Outcome for one planned file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Canonical key of the item that supplied the file
    pub item: String,
    /// Destination relative to the project root
    pub path: PathBuf,
    /// What happened
    pub outcome: FileOutcome,
}

/// Per-item summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Every file is in place.
    Installed,
    /// At least one file was left alone because it already existed.
    SkippedExisting,
    /// At least one file could not be written.
    Failed,
}

/// Aggregated outcome of applying a plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    /// One report per planned file
    pub files: Vec<FileReport>,
    /// Whether this is a preview
    pub dry_run: bool,
}

impl InstallReport {
    /// Reports for files that received new content.
    pub fn written(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.outcome.is_written())
    }

    /// Reports for files left alone because they already existed.
    pub fn skipped(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::Skipped)
    }

    /// Reports for files that could not be written.
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    /// Check if any file failed.
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Status of each item, in the given order.
    pub fn item_statuses(&self, items: &[String]) -> Vec<(String, ItemStatus)> {
        items
            .iter()
            .map(|item| {
                let outcomes: Vec<_> = self
                    .files
                    .iter()
                    .filter(|f| &f.item == item)
                    .map(|f| &f.outcome)
                    .collect();

                let status = if outcomes
                    .iter()
                    .any(|o| matches!(o, FileOutcome::Failed { .. }))
                {
                    ItemStatus::Failed
                } else if outcomes.iter().any(|o| **o == FileOutcome::Skipped) {
                    ItemStatus::SkippedExisting
                } else {
                    ItemStatus::Installed
                };
                (item.clone(), status)
            })
            .collect()
    }
}

/// Write every planned file.
pub fn apply_plan(plan: &InstallPlan) -> InstallReport {
    let files = plan
        .files
        .iter()
        .map(|file| FileReport {
            item: file.item.clone(),
            path: file.relative.clone(),
            outcome: apply_file(file),
        })
        .collect();

    InstallReport {
        files,
        dry_run: false,
    }
}

/// Report what [`apply_plan`] would do, without touching disk.
pub fn preview(plan: &InstallPlan) -> InstallReport {
    let files = plan
        .files
        .iter()
        .map(|file| FileReport {
            item: file.item.clone(),
            path: file.relative.clone(),
            outcome: match &file.action {
                PlannedAction::Create => FileOutcome::Written,
                PlannedAction::Overwrite => FileOutcome::Overwritten {
                    backup: backup_path(&file.destination),
                },
                PlannedAction::Skip => FileOutcome::Skipped,
                PlannedAction::Unchanged => FileOutcome::Unchanged,
                PlannedAction::Reject { reason } => FileOutcome::Failed {
                    reason: reason.clone(),
                },
            },
        })
        .collect();

    InstallReport {
        files,
        dry_run: true,
    }
}

fn apply_file(file: &PlannedFile) -> FileOutcome {
    match &file.action {
        PlannedAction::Create => match write(&file.destination, &file.content) {
            Ok(()) => {
                debug!("Created {}", file.relative.display());
                FileOutcome::Written
            }
            Err(reason) => FileOutcome::Failed { reason },
        },

        PlannedAction::Overwrite => {
            let backup = create_backup(&file.destination);
            if let Err(e) = &backup {
                warn!(
                    "Could not back up {}: {}; overwriting anyway",
                    file.relative.display(),
                    e
                );
            }

            match (write(&file.destination, &file.content), backup) {
                (Err(reason), _) => FileOutcome::Failed { reason },
                (Ok(()), Ok(backup)) => {
                    debug!("Updated {}", file.relative.display());
                    FileOutcome::Overwritten { backup }
                }
                (Ok(()), Err(e)) => FileOutcome::OverwrittenUnprotected {
                    reason: e.to_string(),
                },
            }
        }

        PlannedAction::Skip => {
            debug!("Skipped {} (already exists)", file.relative.display());
            FileOutcome::Skipped
        }

        PlannedAction::Unchanged => FileOutcome::Unchanged,

        PlannedAction::Reject { reason } => {
            warn!("Refusing to write {}: {}", file.source, reason);
            FileOutcome::Failed {
                reason: reason.clone(),
            }
        }
    }
}

fn write(destination: &Path, content: &str) -> Result<(), String> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    fs::write(destination, content)
        .map_err(|e| format!("Failed to write {}: {}", destination.display(), e))
}
