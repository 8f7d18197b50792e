//! The flattened result of resolving a set of items.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{KitboxError, Result};
use crate::merge::{merge_css_vars, merge_into};
use crate::packages::PackageSpec;
use crate::registry::fetcher::ResolvedItem;
use crate::registry::item::{CssVars, ItemType, ROOT_PREFIX};
use crate::registry::resolver::VersionConflictPolicy;

/// Package name to optional version requirement, in first-seen order.
pub type PackageMap = IndexMap<String, Option<String>>;

/// A file contributed by a resolved item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFile {
    /// Canonical key of the item that supplied the file.
    pub item: String,
    /// Path of the file inside the registry.
    pub path: String,
    /// File content.
    pub content: String,
    /// Explicit destination, if the item declared one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// File kind.
    #[serde(rename = "type")]
    pub file_type: ItemType,
}

impl ResolvedFile {
    /// Key identifying where the file will be installed.
    ///
    /// Explicit targets key on the target without `~/`. Files placed through
    /// an alias key on the alias and base name.
    pub fn destination_key(&self) -> String {
        if let Some(target) = &self.target {
            return target.strip_prefix(ROOT_PREFIX).unwrap_or(target).to_string();
        }
        match self.file_type.alias() {
            Some(alias) => {
                let name = Path::new(&self.path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(&self.path);
                format!("{}:{}", alias, name)
            }
            None => self.path.clone(),
        }
    }
}

/// Deduplicated union of every visited item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTree {
    /// Canonical keys of merged items, dependencies first.
    pub items: Vec<String>,
    /// One entry per destination, ordered by first appearance.
    pub files: Vec<ResolvedFile>,
    /// Runtime package dependencies.
    pub dependencies: PackageMap,
    /// Development package dependencies.
    pub dev_dependencies: PackageMap,
    /// Merged framework config fragment.
    pub tailwind: Value,
    /// Merged CSS variables keyed by mode.
    pub css_vars: CssVars,
    /// Post-install notes, one per item that has any.
    pub docs: Vec<String>,
    /// Environment variables required by any item.
    pub env_vars: Vec<String>,

    #[serde(skip)]
    file_index: HashMap<String, usize>,
}

impl ResolvedTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            tailwind: Value::Object(Default::default()),
            ..Default::default()
        }
    }

    /// Whether any item was merged.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the tree carries a framework config fragment.
    pub fn has_framework_config(&self) -> bool {
        self.tailwind.as_object().is_some_and(|m| !m.is_empty())
    }

    /// Merge one item into the tree.
    ///
    /// Files from a later item replace earlier files with the same
    /// destination but keep the earlier position.
    pub fn merge_item(
        &mut self,
        resolved: &ResolvedItem,
        versions: VersionConflictPolicy,
    ) -> Result<()> {
        let item = &resolved.item;
        self.items.push(resolved.key.clone());

        for file in &item.files {
            let entry = ResolvedFile {
                item: resolved.key.clone(),
                path: file.path.clone(),
                content: file.content.clone(),
                target: file.target.clone(),
                file_type: file.file_type,
            };
            let key = entry.destination_key();
            match self.file_index.get(&key) {
                Some(&position) => {
                    debug!(
                        "{} replaces {} from {}",
                        resolved.key, key, self.files[position].item
                    );
                    self.files[position] = entry;
                }
                None => {
                    self.file_index.insert(key, self.files.len());
                    self.files.push(entry);
                }
            }
        }

        for raw in &item.dependencies {
            merge_package(&mut self.dependencies, PackageSpec::parse(raw), versions)?;
        }
        for raw in &item.dev_dependencies {
            merge_package(&mut self.dev_dependencies, PackageSpec::parse(raw), versions)?;
        }

        if let Some(fragment) = &item.tailwind {
            merge_into(&mut self.tailwind, &Value::Object(fragment.config.clone()));
        }
        if !item.css_vars.is_empty() {
            self.css_vars = merge_css_vars(&self.css_vars, &item.css_vars);
        }

        if let Some(docs) = item.docs.as_deref().map(str::trim) {
            if !docs.is_empty() {
                self.docs.push(docs.to_string());
            }
        }
        for var in &item.env_vars {
            if !self.env_vars.contains(var) {
                self.env_vars.push(var.clone());
            }
        }

        Ok(())
    }
}

fn merge_package(
    packages: &mut PackageMap,
    spec: PackageSpec,
    policy: VersionConflictPolicy,
) -> Result<()> {
    if spec.name.is_empty() {
        return Ok(());
    }

    let Some(current) = packages.get_mut(&spec.name) else {
        packages.insert(spec.name, spec.version);
        return Ok(());
    };

    match (current.as_deref(), spec.version.as_deref()) {
        (_, None) => {}
        (None, Some(_)) => *current = spec.version,
        (Some(first), Some(second)) if first == second => {}
        (Some(first), Some(second)) => {
            warn!(
                "Package {} requested as {} and {}",
                spec.name, first, second
            );
            match policy {
                VersionConflictPolicy::LastWins => *current = spec.version,
                VersionConflictPolicy::FirstWins => {}
                VersionConflictPolicy::Error => {
                    return Err(KitboxError::VersionConflict {
                        package: spec.name,
                        first: first.to_string(),
                        second: second.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}
