//! Item reference syntax.
//!
//! A reference is one of:
//! - a bare name (`button`), searched in the default registries
//! - a namespaced name (`@acme/button`), looked up in one registry
//! - a fully-qualified URL to a single item JSON document

use std::fmt;

use crate::error::{KitboxError, Result};

/// A parsed item reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemReference {
    /// Name resolved against the default registries in order.
    Bare(String),
    /// Name in an explicit registry.
    Namespaced { registry: String, name: String },
    /// Direct URL to an item document.
    Url(String),
}

impl ItemReference {
    /// Parse a reference string.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || KitboxError::ItemNotFound {
            reference: raw.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid());
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self::Url(raw.to_string()));
        }

        if raw.starts_with('@') {
            let (registry, name) = raw.split_once('/').ok_or_else(invalid)?;
            if registry.len() < 2 || name.is_empty() || name.contains('/') {
                return Err(invalid());
            }
            return Ok(Self::Namespaced {
                registry: registry.to_string(),
                name: name.to_string(),
            });
        }

        if raw.contains('/') || raw.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self::Bare(raw.to_string()))
    }

    /// Canonical key for an item found in `registry`.
    pub fn canonical(registry: &str, name: &str) -> String {
        format!("{}/{}", registry, name)
    }

    /// The item name, when the reference carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Bare(name) | Self::Namespaced { name, .. } => Some(name),
            Self::Url(_) => None,
        }
    }
}

impl fmt::Display for ItemReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(name) => write!(f, "{}", name),
            Self::Namespaced { registry, name } => write!(f, "{}/{}", registry, name),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}
