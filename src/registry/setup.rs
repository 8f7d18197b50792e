//! Building a [`RegistryIndex`] from project configuration.

use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{
    local_registry_dir, resolve_string, InterpolationContext, ProjectConfig, RegistryConfig,
    LOCAL_REGISTRY,
};
use crate::error::{KitboxError, Result};
use crate::registry::builtin::{builtin_registry, BUILTIN_REGISTRY};
use crate::registry::fetch::HttpFetcher;
use crate::registry::item::RegistryItem;
use crate::registry::memory::MemoryRegistry;
use crate::registry::remote::HttpRegistry;
use crate::registry::source::{RegistryIndex, RegistrySource};

/// Register every source available to a project.
///
/// `@builtin` is always present and `@local` is added when
/// `.kitbox/registry/` exists. Without configured defaults, bare names are
/// searched in `@local` then `@builtin`.
pub fn build_index(
    config: &ProjectConfig,
    project_root: &Path,
    env: &InterpolationContext,
) -> Result<RegistryIndex> {
    let mut index = RegistryIndex::new().with_url_fetcher(HttpFetcher::new()?);

    for (name, registry) in &config.registries {
        index.add_source(remote_source(name, registry, env)?);
    }

    let local_dir = local_registry_dir(project_root);
    let has_local = local_dir.is_dir();
    if has_local {
        let local = MemoryRegistry::load_dir(LOCAL_REGISTRY, &local_dir)?;
        debug!("Loaded {} local item(s)", local.len());
        index.add_source(Box::new(local));
    }

    index.add_source(Box::new(builtin_registry()?));

    let defaults: Vec<String> = if config.default_registries.is_empty() {
        has_local
            .then(|| LOCAL_REGISTRY.to_string())
            .into_iter()
            .chain(std::iter::once(BUILTIN_REGISTRY.to_string()))
            .collect()
    } else {
        config.default_registries.clone()
    };

    Ok(index.with_defaults(defaults))
}

fn remote_source(
    name: &str,
    registry: &RegistryConfig,
    env: &InterpolationContext,
) -> Result<Box<dyn RegistrySource>> {
    let interpolated = resolve_string(&registry.url, env).and_then(|url| {
        let headers = registry
            .headers
            .iter()
            .map(|(key, value)| Ok((key.clone(), resolve_string(value, env)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok((url, headers))
    });

    let (url, headers) = match interpolated {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Registry {} is unavailable: {}", name, e);
            return Ok(Box::new(UnavailableRegistry {
                name: name.to_string(),
                message: e.to_string(),
            }));
        }
    };

    let fetcher = match registry.timeout {
        Some(secs) => HttpFetcher::with_timeout(Duration::from_secs(secs))?,
        None => HttpFetcher::new()?,
    };

    Ok(Box::new(
        HttpRegistry::new(name, url, fetcher).with_headers(headers),
    ))
}

/// A configured registry whose settings could not be resolved.
///
/// Only fails when something actually looks in it.
#[derive(Debug)]
struct UnavailableRegistry {
    name: String,
    message: String,
}

impl RegistrySource for UnavailableRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, item: &str) -> Result<Option<RegistryItem>> {
        Err(KitboxError::RegistryUnreachable {
            reference: format!("{}/{}", self.name, item),
            message: self.message.clone(),
        })
    }
}
