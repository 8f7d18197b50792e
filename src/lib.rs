//! Kitbox - install components from registries into your project.
//!
//! Kitbox resolves registry items together with everything they depend on,
//! writes their files into the project, merges their framework config and
//! CSS variables, and installs their npm packages.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Project configuration loading, merging, and validation
//! - [`error`] - Error types and result aliases
//! - [`install`] - Writing resolved files and config fragments into a project
//! - [`merge`] - Pure merges of framework config and CSS variables
//! - [`packages`] - Package dependency aggregation and installation
//! - [`registry`] - Registry sources, item lookup, and dependency resolution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use kitbox::registry::{
//!     builtin_registry, resolve_tree, RegistryIndex, ResolutionContext, ResolveOptions,
//! };
//!
//! let index = RegistryIndex::new()
//!     .with_source(builtin_registry().unwrap())
//!     .with_defaults(["@builtin"]);
//! let mut ctx = ResolutionContext::new(&index);
//!
//! let tree = resolve_tree(&["card"], &mut ctx, ResolveOptions::default()).unwrap();
//! assert_eq!(
//!     tree.items,
//!     ["@builtin/utils", "@builtin/button", "@builtin/badge", "@builtin/card"]
//! );
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod merge;
pub mod packages;
pub mod registry;
pub mod ui;

pub use error::{KitboxError, Result};
