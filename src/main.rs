//! `onway` - CLI for the on-the-way arrival dashboard
//!
//! This binary provides the command-line interface for the interactive
//! dashboard and the one-shot summary, status, and ruleset commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use clap::Parser;

use ontheway::app::{run_dashboard, AppState};
use ontheway::chart::{render_chart, render_rules, render_table, ChartOptions};
use ontheway::cli::{Cli, Command, ConfigCommand, OutputFormat, SummaryCommand};
use ontheway::filter::Selection;
use ontheway::{init_logging, summarize, Config, Database, Error};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // The database target: CLI flag over config file over environment
    let database = cli.database.clone().or_else(|| config.database.path.clone());

    // Execute the command
    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => handle_dashboard(config, database)?,
        Command::Summary(cmd) => handle_summary(&config, database.as_deref(), &cmd)?,
        Command::Status(cmd) => handle_status(&config, database.as_deref(), cmd.json)?,
        Command::Rules(cmd) => handle_rules(&config, cmd.json)?,
        Command::Config(cmd) => handle_config(&config, cmd)?,
    }
    Ok(())
}

fn handle_dashboard(config: Config, database: Option<PathBuf>) -> ontheway::Result<()> {
    let zones = config.zone_map()?;
    let state = AppState::new(config, zones, database);
    run_dashboard(state)
}

fn handle_summary(
    config: &Config,
    database: Option<&Path>,
    cmd: &SummaryCommand,
) -> ontheway::Result<()> {
    let zones = config.zone_map()?;
    let path = database.ok_or(Error::DatabaseNotConfigured)?;
    let records = Database::fetch_with_retry(path, &zones, &config.retry)?;

    // Flags narrow the default everything-selected view
    let mut selection = Selection::all_for(&records);
    if !cmd.zones.is_empty() {
        selection.zones = cmd.zones.iter().cloned().collect();
    }
    if !cmd.dates.is_empty() {
        selection.dates = cmd.dates.iter().copied().collect();
    }

    let filtered = selection.apply(&records);
    let summary = summarize(&filtered, &zones);

    let mut options = ChartOptions::from(&config.display);
    if let Some(width) = cmd.width {
        options.width = width;
    }

    match cmd.format {
        OutputFormat::Chart => print!("{}", render_chart(&summary, &zones, &options)),
        OutputFormat::Table => print!("{}", render_table(&summary, &options)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

fn handle_status(config: &Config, database: Option<&Path>, json: bool) -> ontheway::Result<()> {
    let zones = config.zone_map()?;

    let (db_display, row_count) = match database {
        None => ("not configured".to_string(), None),
        Some(path) => match Database::open(path).and_then(|db| db.count()) {
            Ok(count) => (path.display().to_string(), Some(count)),
            Err(err) => (format!("{} (unavailable: {err})", path.display()), None),
        },
    };

    if json {
        let status = serde_json::json!({
            "database": database,
            "row_count": row_count,
            "zones": zones.zone_names(),
            "rules_file": config.zones.rules_file,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("onway status");
        println!("------------");
        println!("Database:  {db_display}");
        if let Some(count) = row_count {
            println!("Rows:      {count}");
        }
        println!("Zones:     {}", zones.len());
        match &config.zones.rules_file {
            Some(path) => println!("Ruleset:   {}", path.display()),
            None => println!("Ruleset:   built-in"),
        }
    }
    Ok(())
}

fn handle_rules(config: &Config, json: bool) -> ontheway::Result<()> {
    let zones = config.zone_map()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&zones)?);
    } else {
        println!("{}", render_rules(&zones));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> ontheway::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Database]");
                match &config.database.path {
                    Some(path) => println!("  Path:             {}", path.display()),
                    None => println!("  Path:             (not set)"),
                }
                println!();
                println!("[Retry]");
                println!("  Max attempts:     {}", config.retry.max_attempts);
                println!("  Base delay (ms):  {}", config.retry.base_delay_ms);
                println!("  Busy timeout (ms): {}", config.retry.busy_timeout_ms);
                println!();
                println!("[Display]");
                println!("  Chart width:      {}", config.display.chart_width);
                println!("  Show unclassified: {}", config.display.show_unclassified);
                println!();
                println!("[Zones]");
                match &config.zones.rules_file {
                    Some(path) => println!("  Rules file:       {}", path.display()),
                    None => println!("  Rules file:       (built-in ruleset)"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(loaded) => match loaded.zone_map() {
                    Ok(_) => println!("Configuration is valid."),
                    Err(e) => println!("Zone ruleset error: {e}"),
                },
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
