//! Item fetching with per-resolution memoization.
//!
//! A [`ResolutionContext`] owns the fetch cache for one resolution run.
//! Independent runs use independent contexts and never see each other's
//! results; reusing a context shares its cache deliberately.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::debug;

use crate::error::{KitboxError, Result};
use crate::registry::item::RegistryItem;
use crate::registry::reference::ItemReference;
use crate::registry::source::RegistryIndex;

/// An item together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    /// Canonical key (`@registry/name`, or the URL).
    pub key: String,
    /// Registry the item came from (`None` for URL references).
    pub registry: Option<String>,
    /// The validated item.
    pub item: RegistryItem,
}

/// Fetch cache and lookup state for one resolution run.
#[derive(Debug)]
pub struct ResolutionContext<'a> {
    index: &'a RegistryIndex,
    items: HashMap<String, Rc<ResolvedItem>>,
    misses: HashSet<String>,
    fetches: usize,
}

impl<'a> ResolutionContext<'a> {
    /// Create a context with an empty cache.
    pub fn new(index: &'a RegistryIndex) -> Self {
        Self {
            index,
            items: HashMap::new(),
            misses: HashSet::new(),
            fetches: 0,
        }
    }

    /// The index this context resolves against.
    pub fn index(&self) -> &'a RegistryIndex {
        self.index
    }

    /// Number of lookups that reached a registry source.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Resolve a reference against the default registries.
    pub fn resolve_item(&mut self, reference: &str) -> Result<Rc<ResolvedItem>> {
        self.resolve_in(reference, None)
    }

    /// Resolve a reference found inside an item from `parent_registry`.
    ///
    /// Bare names are searched in the default registries first, then in the
    /// parent's registry.
    pub fn resolve_in(
        &mut self,
        reference: &str,
        parent_registry: Option<&str>,
    ) -> Result<Rc<ResolvedItem>> {
        match ItemReference::parse(reference)? {
            ItemReference::Url(url) => self.resolve_url(&url),
            ItemReference::Namespaced { registry, name } => {
                if !self.index.has_registry(&registry) {
                    return Err(KitboxError::RegistryNotConfigured {
                        registry,
                        reference: reference.to_string(),
                    });
                }
                self.lookup(&registry, &name)?
                    .ok_or_else(|| KitboxError::ItemNotFound {
                        reference: reference.to_string(),
                    })
            }
            ItemReference::Bare(name) => {
                let mut candidates: Vec<String> = self
                    .index
                    .defaults()
                    .into_iter()
                    .map(String::from)
                    .collect();
                if let Some(parent) = parent_registry {
                    if !candidates.iter().any(|c| c == parent) {
                        candidates.push(parent.to_string());
                    }
                }

                for registry in &candidates {
                    if let Some(found) = self.lookup(registry, &name)? {
                        return Ok(found);
                    }
                }

                Err(KitboxError::ItemNotFound {
                    reference: reference.to_string(),
                })
            }
        }
    }

    fn lookup(&mut self, registry: &str, name: &str) -> Result<Option<Rc<ResolvedItem>>> {
        let key = ItemReference::canonical(registry, name);

        if let Some(hit) = self.items.get(&key) {
            return Ok(Some(Rc::clone(hit)));
        }
        if self.misses.contains(&key) {
            return Ok(None);
        }

        self.fetches += 1;
        match self.index.lookup(registry, name)? {
            Some(item) => {
                debug!("Resolved {}", key);
                let resolved = Rc::new(ResolvedItem {
                    key: key.clone(),
                    registry: Some(registry.to_string()),
                    item,
                });
                self.items.insert(key, Rc::clone(&resolved));
                Ok(Some(resolved))
            }
            None => {
                debug!("{} not found in {}", name, registry);
                self.misses.insert(key);
                Ok(None)
            }
        }
    }

    fn resolve_url(&mut self, url: &str) -> Result<Rc<ResolvedItem>> {
        if let Some(hit) = self.items.get(url) {
            return Ok(Rc::clone(hit));
        }

        self.fetches += 1;
        let item = self.index.fetch_url(url)?;
        let resolved = Rc::new(ResolvedItem {
            key: url.to_string(),
            registry: None,
            item,
        });
        self.items.insert(url.to_string(), Rc::clone(&resolved));
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::item::ItemType;
    use crate::registry::memory::MemoryRegistry;

    fn item(name: &str, description: &str) -> RegistryItem {
        let mut item = RegistryItem::new(name, ItemType::Ui);
        item.description = Some(description.to_string());
        item
    }

    fn index() -> RegistryIndex {
        RegistryIndex::new()
            .with_source(MemoryRegistry::from_items(
                "@first",
                vec![item("button", "first button")],
            ))
            .with_source(MemoryRegistry::from_items(
                "@second",
                vec![item("button", "second button"), item("badge", "badge")],
            ))
            .with_source(MemoryRegistry::from_items(
                "@private",
                vec![item("secret", "secret")],
            ))
            .with_defaults(["@first", "@second"])
    }

    #[test]
    fn bare_reference_uses_first_default_registry() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        let resolved = ctx.resolve_item("button").unwrap();
        assert_eq!(resolved.key, "@first/button");
        assert_eq!(resolved.item.description.as_deref(), Some("first button"));
    }

    #[test]
    fn bare_reference_falls_through_to_later_defaults() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        assert_eq!(ctx.resolve_item("badge").unwrap().key, "@second/badge");
    }

    #[test]
    fn namespaced_reference_bypasses_defaults() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        let resolved = ctx.resolve_item("@second/button").unwrap();
        assert_eq!(resolved.item.description.as_deref(), Some("second button"));
    }

    #[test]
    fn bare_reference_does_not_search_non_default_registries() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        assert!(matches!(
            ctx.resolve_item("secret"),
            Err(KitboxError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn bare_reference_falls_back_to_parent_registry() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        let resolved = ctx.resolve_in("secret", Some("@private")).unwrap();
        assert_eq!(resolved.key, "@private/secret");
    }

    #[test]
    fn unknown_namespace_is_not_configured() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        assert!(matches!(
            ctx.resolve_item("@nope/button"),
            Err(KitboxError::RegistryNotConfigured { .. })
        ));
    }

    #[test]
    fn missing_namespaced_item_is_not_found() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        let err = ctx.resolve_item("@first/badge").unwrap_err();
        match err {
            KitboxError::ItemNotFound { reference } => assert_eq!(reference, "@first/badge"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn repeated_references_are_memoized() {
        let index = index();
        let mut ctx = ResolutionContext::new(&index);
        ctx.resolve_item("badge").unwrap();
        let after_first = ctx.fetch_count();
        ctx.resolve_item("badge").unwrap();
        ctx.resolve_item("@second/badge").unwrap();
        assert_eq!(ctx.fetch_count(), after_first);
    }

    #[test]
    fn independent_contexts_do_not_share_cache() {
        let index = index();
        let mut first = ResolutionContext::new(&index);
        first.resolve_item("button").unwrap();

        let mut second = ResolutionContext::new(&index);
        assert_eq!(second.fetch_count(), 0);
        second.resolve_item("button").unwrap();
        assert_eq!(second.fetch_count(), 1);
    }
}
