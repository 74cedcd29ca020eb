//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Restrict to these zones (repeatable); defaults to every zone present
    #[arg(short, long = "zone", value_name = "ZONE")]
    pub zones: Vec<String>,

    /// Restrict to these departure dates, YYYY-MM-DD (repeatable); defaults
    /// to every date present
    #[arg(long = "date", value_name = "DATE")]
    pub dates: Vec<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "chart")]
    pub format: OutputFormat,

    /// Bar width in characters for chart output
    #[arg(short, long)]
    pub width: Option<usize>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Rules command arguments.
#[derive(Debug, Args)]
pub struct RulesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for the summary command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored bar chart
    #[default]
    Chart,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
