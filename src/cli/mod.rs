//! Command-line interface for Kitbox.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{AddArgs, BackupAction, BackupArgs, Cli, Commands, CompletionsArgs, ViewArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
