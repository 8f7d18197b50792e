//! Configuration schema definitions for kitbox.
//!
//! This module contains the struct definitions that map to
//! `.kitbox/config.yml`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::install::CaseStyle;
use crate::packages::PackageManager;
use crate::registry::ResolveOptions;

/// Root configuration structure for `.kitbox/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Named registries (`@name` -> URL or detailed config)
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub registries: IndexMap<String, RegistryConfig>,

    /// Registries searched for bare references, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub default_registries: Vec<String>,

    /// Output directories per file type
    pub aliases: Aliases,

    /// Framework config file (JSON), relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_config: Option<PathBuf>,

    /// Global stylesheet (CSS), relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,

    /// Case transform applied to installed file names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_case: Option<CaseStyle>,

    /// Dependency resolution policies
    pub resolve: ResolveOptions,

    /// Package manager override (detected from lockfiles otherwise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,
}

/// A remote registry, written either as a bare URL or as a mapping.
///
/// ```yaml
/// registries:
///   "@short": https://short.dev/r
///   "@acme":
///     url: https://acme.dev/r/{name}.json
///     headers:
///       Authorization: "Bearer ${ACME_TOKEN}"
///     timeout: 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegistryConfigRepr")]
pub struct RegistryConfig {
    /// Base URL or `{name}` template
    pub url: String,

    /// Headers sent with every request (`${VAR}` expanded)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl RegistryConfig {
    /// A registry with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: IndexMap::new(),
            timeout: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryConfigRepr {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        headers: IndexMap<String, String>,
        #[serde(default)]
        timeout: Option<u64>,
    },
}

impl From<RegistryConfigRepr> for RegistryConfig {
    fn from(repr: RegistryConfigRepr) -> Self {
        match repr {
            RegistryConfigRepr::Url(url) => Self::new(url),
            RegistryConfigRepr::Detailed {
                url,
                headers,
                timeout,
            } => Self {
                url,
                headers,
                timeout,
            },
        }
    }
}

/// Output directory per file type, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aliases {
    /// Composed components
    pub components: String,
    /// UI primitives
    pub ui: String,
    /// Library code
    pub lib: String,
    /// Hooks
    pub hooks: String,
    /// Pages
    pub pages: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: "components".to_string(),
            ui: "components/ui".to_string(),
            lib: "lib".to_string(),
            hooks: "hooks".to_string(),
            pages: "app".to_string(),
        }
    }
}

impl Aliases {
    /// Directory configured for a named alias.
    pub fn get(&self, alias: &str) -> Option<&str> {
        match alias {
            "components" => Some(&self.components),
            "ui" => Some(&self.ui),
            "lib" => Some(&self.lib),
            "hooks" => Some(&self.hooks),
            "pages" => Some(&self.pages),
            _ => None,
        }
        .map(String::as_str)
    }
}
