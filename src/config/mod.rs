//! Configuration loading, parsing, and validation for kitbox.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//! - `${VAR}` expansion in [`interpolation`]
//!
//! # Example
//!
//! ```
//! use kitbox::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".kitbox");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "stylesheet: app/globals.css").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert!(config.stylesheet.is_some());
//! ```
//!
//! # Configuration File Locations
//!
//! kitbox discovers and merges configuration in this order:
//! 1. Project config (`.kitbox/config.yml`)
//! 2. Local overrides (`.kitbox/config.local.yml`)

pub mod interpolation;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{Aliases, ProjectConfig, RegistryConfig};

// Loader re-exports
pub use loader::{
    find_project_root, load_config_value, load_merged_config, load_or_default,
    local_registry_dir, parse_config, ConfigPaths, CONFIG_DIR,
};

// Merger re-exports
pub use merger::{deep_merge, merge_configs};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError, LOCAL_REGISTRY};

// Interpolation re-exports
pub use interpolation::{parse_interpolation, resolve_string, InterpolationContext, Segment};
