//! Built-in registry embedded at compile time.

use include_dir::{include_dir, Dir};

use crate::error::{KitboxError, Result};
use crate::registry::item::RegistryItem;
use crate::registry::memory::MemoryRegistry;

/// Name of the bundled registry.
pub const BUILTIN_REGISTRY: &str = "@builtin";

/// Embedded registry directory.
static REGISTRY_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/registry");

/// Load all built-in items.
pub fn load_items() -> Result<Vec<RegistryItem>> {
    let mut items = Vec::new();

    for file in REGISTRY_DIR.files() {
        if file.path().extension().map(|e| e == "json") != Some(true) {
            continue;
        }

        let reference = file.path().display().to_string();
        let content = file
            .contents_utf8()
            .ok_or_else(|| KitboxError::SchemaValidation {
                reference: reference.clone(),
                message: "Invalid UTF-8".to_string(),
            })?;

        let item = RegistryItem::from_json(content)
            .map_err(|message| KitboxError::SchemaValidation { reference, message })?;
        items.push(item);
    }

    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(items)
}

/// Build the `@builtin` registry.
pub fn builtin_registry() -> Result<MemoryRegistry> {
    Ok(MemoryRegistry::from_items(BUILTIN_REGISTRY, load_items()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::source::RegistrySource;

    #[test]
    fn builtin_items_parse() {
        let items = load_items().unwrap();
        assert!(!items.is_empty());
        assert!(items.iter().any(|i| i.name == "utils"));
    }

    #[test]
    fn builtin_registry_is_named() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.name(), BUILTIN_REGISTRY);
        assert!(registry.lookup("theme-neutral").unwrap().is_some());
    }

    #[test]
    fn builtin_dependencies_are_bundled() {
        let registry = builtin_registry().unwrap();
        for name in registry.item_names() {
            let item = registry.lookup(name).unwrap().unwrap();
            for dep in &item.registry_dependencies {
                assert!(
                    registry.lookup(dep).unwrap().is_some(),
                    "{} depends on missing {}",
                    name,
                    dep
                );
            }
        }
    }
}
