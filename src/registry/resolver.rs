//! Dependency graph resolution.
//!
//! Walks `registryDependencies` depth-first from the requested items and
//! merges every reachable item exactly once, dependencies before the items
//! that declare them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{KitboxError, Result};
use crate::registry::fetcher::ResolutionContext;
use crate::registry::tree::ResolvedTree;

/// What to do when an item depends (transitively) on itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Break the cycle silently.
    Tolerate,
    /// Break the cycle and log a warning.
    #[default]
    Warn,
    /// Fail resolution.
    Error,
}

/// What to do when two items request different versions of a package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionConflictPolicy {
    /// Keep the version from the item merged last.
    #[default]
    LastWins,
    /// Keep the version seen first.
    FirstWins,
    /// Fail resolution.
    Error,
}

/// Resolution policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ResolveOptions {
    /// Cycle handling
    pub cycles: CyclePolicy,
    /// Package version conflict handling
    pub version_conflicts: VersionConflictPolicy,
}

/// Resolve the requested references into one flattened tree.
///
/// Fails with the first reference that cannot be resolved.
pub fn resolve_tree<S: AsRef<str>>(
    requested: &[S],
    ctx: &mut ResolutionContext<'_>,
    options: ResolveOptions,
) -> Result<ResolvedTree> {
    let mut walk = Walk {
        ctx,
        options,
        stack: Vec::new(),
        done: HashSet::new(),
        tree: ResolvedTree::new(),
    };

    for reference in requested {
        walk.visit(reference.as_ref(), None)?;
    }

    debug!("Resolved {} item(s)", walk.tree.items.len());
    Ok(walk.tree)
}

struct Walk<'c, 'a> {
    ctx: &'c mut ResolutionContext<'a>,
    options: ResolveOptions,
    stack: Vec<String>,
    done: HashSet<String>,
    tree: ResolvedTree,
}

impl Walk<'_, '_> {
    fn visit(&mut self, reference: &str, parent_registry: Option<&str>) -> Result<()> {
        let resolved = self.ctx.resolve_in(reference, parent_registry)?;
        let key = resolved.key.clone();

        if self.done.contains(&key) {
            return Ok(());
        }

        if let Some(start) = self.stack.iter().position(|k| k == &key) {
            let mut path = self.stack[start..].to_vec();
            path.push(key);
            let cycle = path.join(" -> ");
            match self.options.cycles {
                CyclePolicy::Tolerate => debug!("Ignoring dependency cycle {}", cycle),
                CyclePolicy::Warn => warn!("Dependency cycle {}", cycle),
                CyclePolicy::Error => return Err(KitboxError::CircularDependency { cycle }),
            }
            return Ok(());
        }

        debug!("Visiting {}", key);
        self.stack.push(key.clone());
        for dependency in &resolved.item.registry_dependencies {
            self.visit(dependency, resolved.registry.as_deref())?;
        }
        self.stack.pop();

        self.done.insert(key);
        self.tree
            .merge_item(&resolved, self.options.version_conflicts)
    }
}
