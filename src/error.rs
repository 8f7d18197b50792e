//! Error types for kitbox operations.
//!
//! This module defines [`KitboxError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution errors (not found, unreachable, schema) abort the whole run
//! - Install-time problems are per-file outcomes, not errors
//!   (see [`crate::install::FileOutcome`])
//! - Use `anyhow::Error` (via `KitboxError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kitbox operations.
#[derive(Debug, Error)]
pub enum KitboxError {
    /// Reference did not resolve in any configured or explicit registry.
    #[error("Item not found: {reference}")]
    ItemNotFound { reference: String },

    /// Namespaced reference names a registry that is not configured.
    #[error("Unknown registry '{registry}' in reference {reference}")]
    RegistryNotConfigured { registry: String, reference: String },

    /// Transport failure or unexpected HTTP status while fetching an item.
    #[error("Registry unreachable while fetching {reference}: {message}")]
    RegistryUnreachable { reference: String, message: String },

    /// Fetched document does not match the registry item shape.
    #[error("Invalid registry item {reference}: {message}")]
    SchemaValidation { reference: String, message: String },

    /// Item dependency cycle detected (only raised under the `error` cycle policy).
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// Two items declare different versions of a package (only raised under
    /// the `error` version policy).
    #[error("Conflicting versions for package '{package}': {first} vs {second}")]
    VersionConflict {
        package: String,
        first: String,
        second: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An existing project config target could not be merged into.
    #[error("Cannot merge into {path}: {message}")]
    ConfigMerge { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KitboxError {
    /// Whether this error aborts a resolution run.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound { .. }
                | Self::RegistryNotConfigured { .. }
                | Self::RegistryUnreachable { .. }
                | Self::SchemaValidation { .. }
                | Self::CircularDependency { .. }
                | Self::VersionConflict { .. }
        )
    }
}

/// Result type alias for kitbox operations.
pub type Result<T> = std::result::Result<T, KitboxError>;
