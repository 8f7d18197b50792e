//! Registry item schema definitions.
//!
//! A registry item is a named unit of installable content: files, package
//! dependencies, references to other items, and theme fragments. Items are
//! produced upstream as JSON and consumed here as opaque data.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CSS variables for one mode, in declaration order.
pub type VariableSet = IndexMap<String, String>;

/// CSS variable sets keyed by mode (`light`, `dark`, `theme`, ...).
pub type CssVars = IndexMap<String, VariableSet>;

/// Prefix anchoring an explicit file target at the project root.
pub const ROOT_PREFIX: &str = "~/";

/// An installable registry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistryItem {
    /// Item name (unique within its registry)
    pub name: String,

    /// Item kind
    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Package dependencies, optionally versioned (`zod@^3.22`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Development package dependencies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,

    /// References to other registry items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registry_dependencies: Vec<String>,

    /// Files shipped by this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<RegistryFile>,

    /// Framework config fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailwind: Option<FrameworkFragment>,

    /// CSS variable sets keyed by mode
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub css_vars: CssVars,

    /// Environment variables the item expects to be set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<String>,

    /// Post-install notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

impl RegistryItem {
    /// Create an item with no files or dependencies.
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            item_type,
            description: None,
            dependencies: Vec::new(),
            dev_dependencies: Vec::new(),
            registry_dependencies: Vec::new(),
            files: Vec::new(),
            tailwind: None,
            css_vars: CssVars::new(),
            env_vars: Vec::new(),
            docs: None,
        }
    }

    /// Parse and validate an item from JSON.
    ///
    /// Returns a human-readable message on failure; callers attach the
    /// reference being resolved.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let item: RegistryItem = serde_json::from_str(content).map_err(|e| e.to_string())?;
        item.validate()?;
        Ok(item)
    }

    /// Semantic checks the serde shape cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("item name must not be empty".to_string());
        }
        if self.name.contains('/') || self.name.chars().any(char::is_whitespace) {
            return Err(format!(
                "item name '{}' must not contain '/' or whitespace",
                self.name
            ));
        }
        for file in &self.files {
            if file.path.trim().is_empty() {
                return Err(format!("item '{}' has a file with an empty path", self.name));
            }
        }
        if let Some(dep) = self
            .registry_dependencies
            .iter()
            .find(|d| d.trim().is_empty())
        {
            return Err(format!(
                "item '{}' has an empty registry dependency '{}'",
                self.name, dep
            ));
        }
        Ok(())
    }
}

/// Closed set of item and file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ItemType {
    /// UI primitive
    #[serde(rename = "registry:ui")]
    Ui,
    /// Composed component
    #[serde(rename = "registry:component")]
    Component,
    /// Multi-file block
    #[serde(rename = "registry:block")]
    Block,
    /// Style definition
    #[serde(rename = "registry:style")]
    Style,
    /// Theme tokens
    #[serde(rename = "registry:theme")]
    Theme,
    /// Hook
    #[serde(rename = "registry:hook")]
    Hook,
    /// Library snippet
    #[serde(rename = "registry:lib")]
    Lib,
    /// Page example
    #[serde(rename = "registry:page")]
    Page,
    /// Arbitrary file placed at an explicit target
    #[serde(rename = "registry:file")]
    File,
}

impl ItemType {
    /// The wire name (`registry:ui`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Ui => "registry:ui",
            ItemType::Component => "registry:component",
            ItemType::Block => "registry:block",
            ItemType::Style => "registry:style",
            ItemType::Theme => "registry:theme",
            ItemType::Hook => "registry:hook",
            ItemType::Lib => "registry:lib",
            ItemType::Page => "registry:page",
            ItemType::File => "registry:file",
        }
    }

    /// Alias a file of this type is placed through, `None` for files
    /// placed by their own path.
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            ItemType::Ui => Some("ui"),
            ItemType::Component | ItemType::Block | ItemType::Style | ItemType::Theme => {
                Some("components")
            }
            ItemType::Lib => Some("lib"),
            ItemType::Hook => Some("hooks"),
            ItemType::Page => Some("pages"),
            ItemType::File => None,
        }
    }
}

/// A file shipped by a registry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegistryFile {
    /// Path of the file inside the registry
    pub path: String,

    /// File content
    pub content: String,

    /// Explicit destination relative to the project root (`~/` anchors at the root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// File kind, used to pick the output directory
    #[serde(rename = "type")]
    pub file_type: ItemType,
}

/// Framework config fragment carried by an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameworkFragment {
    /// Object deep-merged into the project's framework config
    #[serde(default)]
    pub config: Map<String, Value>,
}
