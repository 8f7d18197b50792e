//! Registry sources and the index that combines them.
//!
//! The resolver only sees the [`RegistrySource`] capability; whether items
//! come from an in-process map or over HTTP is a detail of each source.

use indexmap::IndexMap;
use std::fmt;

use crate::error::{KitboxError, Result};
use crate::registry::fetch::HttpFetcher;
use crate::registry::item::RegistryItem;
use crate::registry::remote::fetch_item_url;

/// A named source of registry items.
pub trait RegistrySource: fmt::Debug {
    /// Registry name, including the leading `@`.
    fn name(&self) -> &str;

    /// Look up an item by name.
    ///
    /// Returns `Ok(None)` when the registry does not contain the item.
    /// Transport and schema failures are errors, not misses.
    fn lookup(&self, item: &str) -> Result<Option<RegistryItem>>;
}

/// All registries known to one invocation.
#[derive(Debug, Default)]
pub struct RegistryIndex {
    sources: IndexMap<String, Box<dyn RegistrySource>>,
    defaults: Vec<String>,
    url_fetcher: Option<HttpFetcher>,
}

impl RegistryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source. A later source with the same name replaces the earlier one.
    pub fn with_source(mut self, source: impl RegistrySource + 'static) -> Self {
        self.add_source(Box::new(source));
        self
    }

    /// Add a boxed source.
    pub fn add_source(&mut self, source: Box<dyn RegistrySource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    /// Set the registries searched for bare references, in order.
    pub fn with_defaults<I, S>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = defaults.into_iter().map(Into::into).collect();
        self
    }

    /// Use this fetcher for fully-qualified URL references.
    pub fn with_url_fetcher(mut self, fetcher: HttpFetcher) -> Self {
        self.url_fetcher = Some(fetcher);
        self
    }

    /// Registries searched for bare references.
    ///
    /// Falls back to every registered source, in registration order, when no
    /// defaults were configured.
    pub fn defaults(&self) -> Vec<&str> {
        if self.defaults.is_empty() {
            self.sources.keys().map(|s| s.as_str()).collect()
        } else {
            self.defaults.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Check if a registry is configured.
    pub fn has_registry(&self, registry: &str) -> bool {
        self.sources.contains_key(registry)
    }

    /// Names of all registered sources.
    pub fn registry_names(&self) -> Vec<&str> {
        self.sources.keys().map(|s| s.as_str()).collect()
    }

    /// Look up `name` in `registry`.
    pub fn lookup(&self, registry: &str, name: &str) -> Result<Option<RegistryItem>> {
        let source =
            self.sources
                .get(registry)
                .ok_or_else(|| KitboxError::RegistryNotConfigured {
                    registry: registry.to_string(),
                    reference: format!("{}/{}", registry, name),
                })?;
        source.lookup(name)
    }

    /// Fetch an item from a fully-qualified URL.
    pub fn fetch_url(&self, url: &str) -> Result<RegistryItem> {
        match &self.url_fetcher {
            Some(fetcher) => fetch_item_url(fetcher, url, &[]),
            None => {
                let fetcher = HttpFetcher::new().map_err(|e| KitboxError::RegistryUnreachable {
                    reference: url.to_string(),
                    message: e.to_string(),
                })?;
                fetch_item_url(&fetcher, url, &[])
            }
        }
    }
}
