//! Component registries and dependency resolution.
//!
//! This module handles finding registry items and flattening their
//! dependency graphs:
//! - Item schema in [`item`] and reference syntax in [`reference`]
//! - Sources: bundled ([`builtin`]), directory-backed ([`memory`]),
//!   and HTTP ([`remote`]), combined in a [`RegistryIndex`]
//! - Memoized lookup per run in [`fetcher`]
//! - Depth-first graph resolution in [`resolver`], producing a [`ResolvedTree`]
//!
//! # Example
//!
//! ```
//! use kitbox::registry::{
//!     builtin_registry, resolve_tree, RegistryIndex, ResolutionContext, ResolveOptions,
//! };
//!
//! let index = RegistryIndex::new().with_source(builtin_registry().unwrap());
//! let mut ctx = ResolutionContext::new(&index);
//! let tree = resolve_tree(&["init"], &mut ctx, ResolveOptions::default()).unwrap();
//!
//! assert_eq!(tree.items.last().map(String::as_str), Some("@builtin/init"));
//! ```

pub mod builtin;
pub mod fetch;
pub mod fetcher;
pub mod item;
pub mod memory;
pub mod reference;
pub mod remote;
pub mod resolver;
pub mod setup;
pub mod source;
pub mod tree;

// Re-exports
pub use builtin::{builtin_registry, BUILTIN_REGISTRY};
pub use fetch::{FetchResponse, HttpFetcher, HttpStatusError};
pub use fetcher::{ResolutionContext, ResolvedItem};
pub use item::{CssVars, FrameworkFragment, ItemType, RegistryFile, RegistryItem, VariableSet};
pub use memory::MemoryRegistry;
pub use reference::ItemReference;
pub use remote::HttpRegistry;
pub use resolver::{resolve_tree, CyclePolicy, ResolveOptions, VersionConflictPolicy};
pub use setup::build_index;
pub use source::{RegistryIndex, RegistrySource};
pub use tree::{PackageMap, ResolvedFile, ResolvedTree};
