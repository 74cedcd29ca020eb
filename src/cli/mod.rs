//! Command-line interface for ontheway.
//!
//! This module provides the CLI structure and command handlers for the
//! `onway` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, OutputFormat, RulesCommand, StatusCommand, SummaryCommand};

/// onway - zone-wise summary of on-the-way vehicle arrivals
///
/// Connects to the arrivals database, classifies each vehicle code into a
/// geographic zone, and renders a filterable bar chart of counts per zone.
#[derive(Debug, Parser)]
#[command(name = "onway")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the arrivals database (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to the interactive dashboard)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard
    Dashboard,

    /// Print a one-shot zone summary
    Summary(SummaryCommand),

    /// Show database and ruleset status
    Status(StatusCommand),

    /// Print the active zone ruleset
    Rules(RulesCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
