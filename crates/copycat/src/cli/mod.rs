//! Command-line interface for copycat.
//!
//! This module provides the CLI structure for the `copycat` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, CopyCommand, PatternFlags, PatternsCommand};

/// copycat - Copy HTTP messages without the noisy headers
///
/// Reads raw HTTP requests and responses, removes header lines matching the
/// configured exclusion patterns, and prints the result or places it on the
/// clipboard.
#[derive(Debug, Parser)]
#[command(name = "copycat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy a message with excluded headers removed
    #[command(subcommand)]
    Copy(CopyCommand),

    /// Inspect the excluded header patterns
    #[command(subcommand)]
    Patterns(PatternsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
