//! Package dependency aggregation and installation.
//!
//! Registry items declare npm packages; kitbox collects them from a
//! [`ResolvedTree`] and hands them to a [`PackageRunner`].

pub mod manager;
pub mod spec;

pub use manager::{CommandRunner, InstallStatus, PackageManager, PackageRunner};
#[cfg(test)]
pub(crate) use manager::recording::RecordingRunner;
pub use spec::PackageSpec;

use crate::registry::tree::{PackageMap, ResolvedTree};

/// Packages to install, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    /// Runtime dependencies.
    pub dependencies: Vec<PackageSpec>,
    /// Development dependencies.
    pub dev_dependencies: Vec<PackageSpec>,
}

impl PackageSet {
    /// Check if there is nothing to install.
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }

    /// Total number of packages.
    pub fn len(&self) -> usize {
        self.dependencies.len() + self.dev_dependencies.len()
    }

    /// Install through `runner`.
    pub fn install(&self, runner: &dyn PackageRunner) -> crate::error::Result<InstallStatus> {
        runner.run_install(&self.dependencies, &self.dev_dependencies)
    }
}

/// Collect the packages a tree needs, in first-seen order.
///
/// A package declared as both kinds is installed only as a runtime dependency.
pub fn aggregate_dependencies(tree: &ResolvedTree) -> PackageSet {
    let specs = |map: &PackageMap| -> Vec<PackageSpec> {
        map.iter()
            .map(|(name, version)| PackageSpec {
                name: name.clone(),
                version: version.clone(),
            })
            .collect()
    };

    let dependencies = specs(&tree.dependencies);
    let dev_dependencies = specs(&tree.dev_dependencies)
        .into_iter()
        .filter(|dev| !tree.dependencies.contains_key(&dev.name))
        .collect();

    PackageSet {
        dependencies,
        dev_dependencies,
    }
}
