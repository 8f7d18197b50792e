//! Writing merged fragments into the project's framework config file.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{KitboxError, Result};
use crate::merge::merge_framework_config;

/// What happened to a project config target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOutcome {
    /// Target did not exist and was created.
    Created,
    /// Target existed and changed.
    Updated,
    /// Target already contained everything.
    Unchanged,
}

/// Merge `fragment` into the JSON file at `path`.
///
/// A missing file is created from the fragment alone. A file that is not a
/// JSON object fails with [`KitboxError::ConfigMerge`] and is left as is.
pub fn apply_framework_config(path: &Path, fragment: &Value, dry_run: bool) -> Result<ConfigOutcome> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(parse_existing(path, &content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let base = existing
        .clone()
        .unwrap_or_else(|| Value::Object(Default::default()));
    let merged = merge_framework_config(&base, fragment);

    let outcome = match &existing {
        None => ConfigOutcome::Created,
        Some(current) if *current == merged => return Ok(ConfigOutcome::Unchanged),
        Some(_) => ConfigOutcome::Updated,
    };

    if !dry_run {
        let mut content = serde_json::to_string_pretty(&merged)
            .map_err(|e| anyhow::anyhow!("Failed to serialize {}: {}", path.display(), e))?;
        content.push('\n');
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        debug!("Updated {}", path.display());
    }

    Ok(outcome)
}

fn parse_existing(path: &Path, content: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_json::from_str(content).map_err(|e| KitboxError::ConfigMerge {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(KitboxError::ConfigMerge {
            path: path.to_path_buf(),
            message: "expected a JSON object at the top level".to_string(),
        });
    }

    Ok(value)
}
