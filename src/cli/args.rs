//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Kitbox - install components from registries into your project.
#[derive(Debug, Parser)]
#[command(name = "kitbox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add items and their dependencies to the project
    Add(AddArgs),

    /// Print the resolved tree for items as JSON
    View(ViewArgs),

    /// Restore or discard backups made by `add --overwrite`
    Backup(BackupArgs),

    /// Print the JSON schema of a registry item
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `add` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddArgs {
    /// Items to add (`name`, `@registry/name`, or a URL)
    #[arg(required = true)]
    pub items: Vec<String>,

    /// Replace existing files that differ (a backup is kept)
    #[arg(short, long)]
    pub overwrite: bool,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Do not run the package manager
    #[arg(long)]
    pub skip_install: bool,
}

/// Arguments for the `view` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ViewArgs {
    /// Items to resolve
    #[arg(required = true)]
    pub items: Vec<String>,
}

/// Arguments for the `backup` command.
#[derive(Debug, Clone, clap::Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub action: BackupAction,
}

/// What to do with backups.
#[derive(Debug, Clone, Subcommand)]
pub enum BackupAction {
    /// Move `<path>.bak` back over `<path>`
    Restore {
        /// Files to restore, relative to the project root
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Delete `<path>.bak`
    Discard {
        /// Files whose backups should be deleted
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
