//! Interactive dashboard session.
//!
//! The session owns the current in-memory record set explicitly: it is
//! fetched on connect, replaced atomically on refresh, and projected through
//! the pure filter/summarize/render pipeline on every `show`. There is no
//! ambient global state.

use std::path::{Path, PathBuf};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use tracing::info;

use crate::arrival::ArrivalRecord;
use crate::chart::{render_chart, render_rules, ChartOptions};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::Selection;
use crate::storage::Database;
use crate::summary::{summarize, ZoneSummary};
use crate::zone::ZoneMap;

/// The dashboard's application state.
///
/// Owned by the top-level session loop; refresh is an explicit replace
/// operation on the record slot.
#[derive(Debug)]
pub struct AppState {
    config: Config,
    zones: ZoneMap,
    database: Option<PathBuf>,
    records: Option<Vec<ArrivalRecord>>,
    selection: Selection,
}

impl AppState {
    /// Create a new session state with no data loaded.
    #[must_use]
    pub fn new(config: Config, zones: ZoneMap, database: Option<PathBuf>) -> Self {
        Self {
            config,
            zones,
            database,
            records: None,
            selection: Selection::new(),
        }
    }

    /// The configured database target, if any.
    #[must_use]
    pub fn database(&self) -> Option<&Path> {
        self.database.as_deref()
    }

    /// The currently held record set, if one has been loaded.
    #[must_use]
    pub fn records(&self) -> Option<&[ArrivalRecord]> {
        self.records.as_deref()
    }

    /// The current zone and date selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mutable access to the selection, for the selection commands.
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// The active zone ruleset.
    #[must_use]
    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    /// Chart rendering options from the configuration.
    #[must_use]
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions::from(&self.config.display)
    }

    /// Point the session at a database and fetch from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; the previously held record set
    /// is kept in that case.
    pub fn connect(&mut self, path: PathBuf) -> Result<usize> {
        self.database = Some(path);
        self.refresh()
    }

    /// Re-fetch from the configured database, replacing the held record set
    /// atomically and resetting the selection to cover everything fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if no database is configured or the fetch fails; the
    /// previously held record set is kept in that case.
    pub fn refresh(&mut self) -> Result<usize> {
        let path = self.database.clone().ok_or(Error::DatabaseNotConfigured)?;

        let fetched = Database::fetch_with_retry(&path, &self.zones, &self.config.retry)?;
        let loaded = fetched.len();
        info!("Loaded {loaded} arrival records from {}", path.display());

        // The empty date set would match nothing, so a fresh fetch selects
        // every zone and date it found.
        self.selection = Selection::all_for(&fetched);
        self.records = Some(fetched);
        Ok(loaded)
    }

    /// The filtered view of the held record set.
    #[must_use]
    pub fn filtered(&self) -> Vec<ArrivalRecord> {
        self.records
            .as_deref()
            .map(|records| self.selection.apply(records))
            .unwrap_or_default()
    }

    /// Aggregate the filtered view into per-zone counts.
    #[must_use]
    pub fn summary(&self) -> ZoneSummary {
        summarize(&self.filtered(), &self.zones)
    }
}

/// Tab completion over the dashboard commands.
#[derive(Debug, Helper, Hinter, Highlighter, Validator)]
pub struct CommandHelper {
    commands: Vec<&'static str>,
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: (*cmd).to_string(),
                    replacement: format!("{cmd} "),
                });
            }
        }

        Ok((0, candidates))
    }
}

const COMMANDS: &[&str] = &[
    "show", "refresh", "connect", "zones", "dates", "zone", "date", "all", "none", "rules", "help",
    "exit",
];

/// Run the interactive dashboard loop.
///
/// Retrieval failures are surfaced as messages and the session continues
/// with whatever record set it already holds.
///
/// # Errors
///
/// Returns an error only for readline failures; data access errors never
/// escape the loop.
pub fn run_dashboard(mut state: AppState) -> Result<()> {
    println!("On The Way arrival summary. Type `help` for commands.");

    if state.database().is_some() {
        match state.refresh() {
            Ok(loaded) => {
                println!("Loaded {loaded} arrival records.");
                print!("{}", render_chart(&state.summary(), state.zones(), &state.chart_options()));
            }
            Err(err) => report_error(&err),
        }
    } else {
        println!("No database configured. Use `connect <path>` to load data.");
    }

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl: Editor<CommandHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(CommandHelper {
        commands: COMMANDS.to_vec(),
    }));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if !dispatch(&mut state, &parts) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Handle one command line. Returns `false` when the session should end.
fn dispatch(state: &mut AppState, parts: &[&str]) -> bool {
    match parts[0] {
        "show" => {
            if state.records().is_none() {
                println!("No data loaded. Use `connect <path>` first.");
            } else {
                print!("{}", render_chart(&state.summary(), state.zones(), &state.chart_options()));
            }
        }
        "refresh" => match state.refresh() {
            Ok(loaded) => {
                println!("Loaded {loaded} arrival records.");
                print!("{}", render_chart(&state.summary(), state.zones(), &state.chart_options()));
            }
            Err(err) => report_error(&err),
        },
        "connect" => {
            if let Some(path) = parts.get(1) {
                match state.connect(PathBuf::from(path)) {
                    Ok(loaded) => {
                        println!("Loaded {loaded} arrival records.");
                        print!("{}", render_chart(&state.summary(), state.zones(), &state.chart_options()));
                    }
                    Err(err) => report_error(&err),
                }
            } else {
                println!("Usage: connect <path>");
            }
        }
        "zones" => match state.records() {
            None => println!("No data loaded."),
            Some(records) => {
                for zone in crate::filter::available_zones(records) {
                    let mark = if state.selection().zones.contains(&zone) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    println!("  {mark} {zone}");
                }
            }
        },
        "dates" => match state.records() {
            None => println!("No data loaded."),
            Some(records) => {
                for date in crate::filter::available_dates(records) {
                    let mark = if state.selection().dates.contains(&date) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    println!("  {mark} {date}");
                }
            }
        },
        "zone" => {
            if parts.len() < 2 {
                println!("Usage: zone <name>...");
            } else {
                for name in &parts[1..] {
                    let selected = state.selection_mut().toggle_zone(name);
                    println!(
                        "  {name}: {}",
                        if selected { "selected" } else { "deselected" }
                    );
                }
            }
        }
        "date" => {
            if parts.len() < 2 {
                println!("Usage: date <YYYY-MM-DD>...");
            } else {
                for raw in &parts[1..] {
                    match raw.parse() {
                        Ok(date) => {
                            let selected = state.selection_mut().toggle_date(date);
                            println!(
                                "  {raw}: {}",
                                if selected { "selected" } else { "deselected" }
                            );
                        }
                        Err(_) => println!("  {raw}: not a valid date (expected YYYY-MM-DD)"),
                    }
                }
            }
        }
        "all" => {
            if let Some(records) = state.records() {
                let selection = Selection::all_for(records);
                *state.selection_mut() = selection;
                println!("Selected every zone and date.");
            } else {
                println!("No data loaded.");
            }
        }
        "none" => {
            *state.selection_mut() = Selection::new();
            println!("Cleared the selection.");
        }
        "rules" => {
            println!("{}", render_rules(state.zones()));
        }
        "help" | "?" => print_help(),
        "exit" | "quit" => return false,
        other => println!("Unknown command: {other}"),
    }
    true
}

fn print_help() {
    println!("\nAvailable Commands:");
    println!("  show               - Render the bar chart for the current selection");
    println!("  refresh            - Re-fetch from the database, replacing the record set");
    println!("  connect <path>     - Point the session at a database and fetch from it");
    println!("  zones / dates      - List available zones/dates with selection marks");
    println!("  zone <name>...     - Toggle zones in the selection");
    println!("  date <d>...        - Toggle departure dates (YYYY-MM-DD) in the selection");
    println!("  all / none         - Select everything / clear the selection");
    println!("  rules              - Print the active zone ruleset");
    println!("  help / ?           - Show this help menu");
    println!("  exit / quit        - Leave the dashboard\n");
}

fn report_error(err: &Error) {
    eprintln!("{} {err}", "error:".red().bold());
    if err.is_data_access() {
        eprintln!("No new data loaded; the previous record set (if any) is still shown.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema;
    use rusqlite::Connection;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.retry.max_attempts = 1;
        config.retry.base_delay_ms = 1;
        config
    }

    fn seeded_db_file(name: &str, rows: &[(&str, &str)]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("onway_app_{name}_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let conn = Connection::open(&path).unwrap();
        for statement in schema::SCHEMA_STATEMENTS {
            conn.execute(statement, []).unwrap();
        }
        for (date, code) in rows {
            conn.execute(
                "INSERT INTO arriving_vehicles (departure_date, vehicle_code) VALUES (?1, ?2)",
                rusqlite::params![date, code],
            )
            .unwrap();
        }
        path
    }

    #[test]
    fn test_new_state_holds_nothing() {
        let state = AppState::new(fast_config(), ZoneMap::default(), None);
        assert!(state.records().is_none());
        assert!(state.filtered().is_empty());
        assert_eq!(state.summary().total, 0);
    }

    #[test]
    fn test_refresh_without_database() {
        let mut state = AppState::new(fast_config(), ZoneMap::default(), None);
        let err = state.refresh().unwrap_err();
        assert!(matches!(err, Error::DatabaseNotConfigured));
    }

    #[test]
    fn test_connect_loads_and_selects_everything() {
        let path = seeded_db_file(
            "connect",
            &[
                ("2024-11-20", "2401"),
                ("2024-11-20", "2410"),
                ("2024-11-21", "9999"),
            ],
        );

        let mut state = AppState::new(fast_config(), ZoneMap::default(), None);
        let loaded = state.connect(path.clone()).unwrap();
        assert_eq!(loaded, 3);
        assert_eq!(state.records().unwrap().len(), 3);

        // Fresh fetch selects all zones and dates, so filtering is identity
        assert_eq!(state.filtered().len(), 3);
        let summary = state.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.counted(), 3);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_records() {
        let path = seeded_db_file("keep", &[("2024-11-20", "2401")]);

        let mut state = AppState::new(fast_config(), ZoneMap::default(), None);
        state.connect(path.clone()).unwrap();
        assert_eq!(state.records().unwrap().len(), 1);

        // Pointing at a bad path fails, but the held set survives
        let err = state
            .connect(PathBuf::from("/nonexistent/arrivals.db"))
            .unwrap_err();
        assert!(err.is_data_access());
        assert_eq!(state.records().unwrap().len(), 1);
        assert_eq!(state.summary().total, 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_refresh_replaces_record_set() {
        let path = seeded_db_file("replace", &[("2024-11-20", "2401")]);

        let mut state = AppState::new(fast_config(), ZoneMap::default(), Some(path.clone()));
        state.refresh().unwrap();
        assert_eq!(state.summary().total, 1);

        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "INSERT INTO arriving_vehicles (departure_date, vehicle_code) VALUES ('2024-11-21', '2450')",
            [],
        )
        .unwrap();
        drop(conn);

        state.refresh().unwrap();
        assert_eq!(state.summary().total, 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_selection_narrows_summary() {
        let path = seeded_db_file(
            "narrow",
            &[
                ("2024-11-20", "2401"),
                ("2024-11-21", "2401"),
                ("2024-11-21", "2410"),
            ],
        );

        let mut state = AppState::new(fast_config(), ZoneMap::default(), Some(path.clone()));
        state.refresh().unwrap();

        state
            .selection_mut()
            .dates
            .retain(|d| *d == "2024-11-21".parse().unwrap());
        let summary = state.summary();
        assert_eq!(summary.total, 2);

        // Clearing the dates matches nothing
        state.selection_mut().dates.clear();
        assert_eq!(state.summary().total, 0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_dispatch_exit() {
        let mut state = AppState::new(fast_config(), ZoneMap::default(), None);
        assert!(!dispatch(&mut state, &["exit"]));
        assert!(!dispatch(&mut state, &["quit"]));
        assert!(dispatch(&mut state, &["help"]));
        assert!(dispatch(&mut state, &["unknown-command"]));
    }

    #[test]
    fn test_dispatch_selection_commands() {
        let path = seeded_db_file("dispatch", &[("2024-11-20", "2401")]);

        let mut state = AppState::new(fast_config(), ZoneMap::default(), None);
        assert!(dispatch(&mut state, &["connect", path.to_str().unwrap()]));
        assert_eq!(state.summary().total, 1);

        assert!(dispatch(&mut state, &["zone", "AlipurBangla"]));
        assert!(!state.selection().zones.contains("AlipurBangla"));
        assert_eq!(state.summary().total, 0);

        assert!(dispatch(&mut state, &["all"]));
        assert_eq!(state.summary().total, 1);

        assert!(dispatch(&mut state, &["none"]));
        assert_eq!(state.summary().total, 0);

        assert!(dispatch(&mut state, &["date", "not-a-date"]));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_command_completion() {
        let helper = CommandHelper {
            commands: COMMANDS.to_vec(),
        };
        let history = rustyline::history::DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("re", 2, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<&str> = candidates.iter().map(|c| c.display.as_str()).collect();
        assert!(names.contains(&"refresh"));
        assert!(!names.contains(&"show"));
    }
}
