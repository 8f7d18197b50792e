//! In-memory registries.
//!
//! Backs the bundled registry and project-local item directories
//! (`.kitbox/registry/*.json`).

use indexmap::IndexMap;
use std::fs;
use std::path::Path;

use crate::error::{KitboxError, Result};
use crate::registry::item::RegistryItem;
use crate::registry::source::RegistrySource;

/// A registry whose items live in an in-process map.
#[derive(Debug, Clone)]
pub struct MemoryRegistry {
    name: String,
    items: IndexMap<String, RegistryItem>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: IndexMap::new(),
        }
    }

    /// Create a registry from a list of items. Later duplicates replace earlier ones.
    pub fn from_items(name: impl Into<String>, items: Vec<RegistryItem>) -> Self {
        let mut registry = Self::new(name);
        for item in items {
            registry.insert(item);
        }
        registry
    }

    /// Load every `*.json` item below `dir` (recursively).
    ///
    /// A missing directory yields an empty registry.
    pub fn load_dir(name: impl Into<String>, dir: &Path) -> Result<Self> {
        let mut registry = Self::new(name);
        if dir.is_dir() {
            registry.load_recursive(dir)?;
        }
        Ok(registry)
    }

    fn load_recursive(&mut self, dir: &Path) -> Result<()> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();

            if path.is_dir() {
                self.load_recursive(&path)?;
            } else if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = fs::read_to_string(&path)?;
                let item = RegistryItem::from_json(&content).map_err(|message| {
                    KitboxError::SchemaValidation {
                        reference: path.display().to_string(),
                        message,
                    }
                })?;
                self.insert(item);
            }
        }

        Ok(())
    }

    /// Insert or replace an item.
    pub fn insert(&mut self, item: RegistryItem) {
        self.items.insert(item.name.clone(), item);
    }

    /// Get all item names.
    pub fn item_names(&self) -> Vec<&str> {
        self.items.keys().map(|s| s.as_str()).collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl RegistrySource for MemoryRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, item: &str) -> Result<Option<RegistryItem>> {
        Ok(self.items.get(item).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::item::ItemType;
    use tempfile::TempDir;

    #[test]
    fn lookup_returns_clone_of_item() {
        let registry =
            MemoryRegistry::from_items("@mem", vec![RegistryItem::new("button", ItemType::Ui)]);
        let item = registry.lookup("button").unwrap().unwrap();
        assert_eq!(item.name, "button");
        assert!(registry.lookup("card").unwrap().is_none());
    }

    #[test]
    fn later_duplicate_replaces_earlier() {
        let mut second = RegistryItem::new("button", ItemType::Ui);
        second.description = Some("second".into());
        let registry = MemoryRegistry::from_items(
            "@mem",
            vec![RegistryItem::new("button", ItemType::Ui), second],
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup("button").unwrap().unwrap().description.as_deref(),
            Some("second")
        );
    }

    #[test]
    fn load_dir_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let registry = MemoryRegistry::load_dir("@local", &temp.path().join("nope")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn load_dir_reads_nested_json() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("ui");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join("card.json"),
            r#"{"name": "card", "type": "registry:component"}"#,
        )
        .unwrap();
        fs::write(
            nested.join("button.json"),
            r#"{"name": "button", "type": "registry:ui"}"#,
        )
        .unwrap();
        fs::write(temp.path().join("README.md"), "not an item").unwrap();

        let registry = MemoryRegistry::load_dir("@local", temp.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.lookup("button").unwrap().is_some());
        assert!(registry.lookup("card").unwrap().is_some());
    }

    #[test]
    fn load_dir_rejects_invalid_item() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.json"), r#"{"name": "broken"}"#).unwrap();

        let err = MemoryRegistry::load_dir("@local", temp.path()).unwrap_err();
        assert!(matches!(err, KitboxError::SchemaValidation { .. }));
    }
}
