//! Single-generation file backups.
//!
//! Overwriting a file first copies it to `<path>.bak`, replacing any older
//! backup. Restoring and discarding are explicit; nothing rolls back
//! automatically.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Suffix appended to backed-up files.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Backup location for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy `path` to its backup location.
pub fn create_backup(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Move the backup of `path` back into place.
///
/// Returns `false` when there is no backup.
pub fn restore_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if !backup.is_file() {
        return Ok(false);
    }
    fs::rename(&backup, path)?;
    debug!("Restored {} from {}", path.display(), backup.display());
    Ok(true)
}

/// Delete the backup of `path`.
///
/// Returns `false` when there is no backup.
pub fn delete_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if !backup.is_file() {
        return Ok(false);
    }
    fs::remove_file(&backup)?;
    debug!("Deleted backup {}", backup.display());
    Ok(true)
}
