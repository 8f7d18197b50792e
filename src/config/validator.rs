//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Registry names look like `@name` and don't shadow built-in registries
//! - Registry URLs are http(s)
//! - Default registries are configured (or built in)
//! - Alias directories stay inside the project

use crate::config::schema::ProjectConfig;
use crate::error::{KitboxError, Result};
use crate::registry::BUILTIN_REGISTRY;
use regex::Regex;
use std::path::{Component, Path};
use std::sync::LazyLock;

/// Name of the registry backed by `.kitbox/registry/`.
pub const LOCAL_REGISTRY: &str = "@local";

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Registry name if the error is registry-specific
    pub registry: Option<String>,
}

impl ValidationError {
    fn new(rule: &str, message: String, registry: Option<&str>) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            registry: registry.map(String::from),
        }
    }
}

/// Registry names: `@` followed by a name segment.
static REGISTRY_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[A-Za-z0-9][A-Za-z0-9._-]*$").expect("REGISTRY_NAME_REGEX must compile")
});

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_registries(config));
    errors.extend(validate_defaults(config));
    errors.extend(validate_aliases(config));

    errors
}

/// Validate a configuration, failing on the first error.
pub fn validate(config: &ProjectConfig) -> Result<()> {
    match validate_config(config).into_iter().next() {
        Some(error) => Err(KitboxError::ConfigValidationError {
            message: error.message,
        }),
        None => Ok(()),
    }
}

fn validate_registries(config: &ProjectConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, registry) in &config.registries {
        if !REGISTRY_NAME_REGEX.is_match(name) {
            errors.push(ValidationError::new(
                "invalid-registry-name",
                format!("Registry name '{}' must look like '@name'", name),
                Some(name),
            ));
        }

        if name == BUILTIN_REGISTRY || name == LOCAL_REGISTRY {
            errors.push(ValidationError::new(
                "reserved-registry-name",
                format!("Registry name '{}' is reserved", name),
                Some(name),
            ));
        }

        if !(registry.url.starts_with("http://") || registry.url.starts_with("https://")) {
            errors.push(ValidationError::new(
                "invalid-registry-url",
                format!(
                    "Registry '{}' URL '{}' must start with http:// or https://",
                    name, registry.url
                ),
                Some(name),
            ));
        }

        if registry.timeout == Some(0) {
            errors.push(ValidationError::new(
                "invalid-timeout",
                format!("Registry '{}' timeout must be greater than zero", name),
                Some(name),
            ));
        }
    }

    errors
}

fn validate_defaults(config: &ProjectConfig) -> Vec<ValidationError> {
    config
        .default_registries
        .iter()
        .filter(|name| {
            !config.registries.contains_key(name.as_str())
                && name.as_str() != BUILTIN_REGISTRY
                && name.as_str() != LOCAL_REGISTRY
        })
        .map(|name| {
            ValidationError::new(
                "unknown-default-registry",
                format!("Default registry '{}' is not configured", name),
                Some(name),
            )
        })
        .collect()
}

fn validate_aliases(config: &ProjectConfig) -> Vec<ValidationError> {
    let aliases = &config.aliases;
    [
        ("components", &aliases.components),
        ("ui", &aliases.ui),
        ("lib", &aliases.lib),
        ("hooks", &aliases.hooks),
        ("pages", &aliases.pages),
    ]
    .into_iter()
    .filter(|(_, dir)| escapes_root(Path::new(dir.as_str())))
    .map(|(alias, dir)| {
        ValidationError::new(
            "alias-outside-project",
            format!("Alias '{}' ({}) must stay inside the project", alias, dir),
            None,
        )
    })
    .collect()
}

fn escapes_root(path: &Path) -> bool {
    path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}
