//! Read-only access to the arrivals database.
//!
//! This module is the retrieval boundary: it issues the one fixed query
//! against the arrivals table, tags each row with its zone, and wraps the
//! whole fetch in a bounded retry with exponential backoff. All failures
//! surface as data access errors; nothing here writes to the source table.

pub mod schema;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info, warn};

use crate::arrival::ArrivalRecord;
use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::zone::ZoneMap;

/// The fixed read statement against the arrivals table.
const SELECT_ARRIVALS: &str = r"
SELECT departure_date, vehicle_code
FROM arriving_vehicles
ORDER BY departure_date, vehicle_code
";

/// Read-only handle to the arrivals database.
#[derive(Debug)]
pub struct Database {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Database {
    /// Open the arrivals database read-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        debug!("Opening database at {}", path.display());
        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |source| Error::DatabaseOpen {
                path: path.clone(),
                source,
            },
        )?;

        Ok(Self { path, conn })
    }

    /// Create a writable in-memory database with the arrivals schema.
    ///
    /// For testing and demo seeding only; the real arrivals table is owned
    /// by the external departure-tracking system.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        for statement in schema::SCHEMA_STATEMENTS {
            conn.execute(statement, [])?;
        }

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the SQLite busy timeout for this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout cannot be set.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Fetch every arrival record, tagged with its zone.
    ///
    /// Classification happens here in application code, equivalent to
    /// evaluating the ruleset at query time. Codes no rule covers come back
    /// with no zone and are counted as unclassified downstream; rows with a
    /// malformed departure date are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fetch_arrivals(&self, zones: &ZoneMap) -> Result<Vec<ArrivalRecord>> {
        let mut stmt = self.conn.prepare(SELECT_ARRIVALS)?;

        let rows = stmt
            .query_map([], |row| {
                let date: String = row.get(0)?;
                let code: String = row.get(1)?;
                Ok((date, code))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (raw_date, code) in rows {
            let Some(date) = parse_departure_date(&raw_date) else {
                warn!("Skipping row with malformed departure date: {raw_date:?}");
                continue;
            };
            let zone = zones.classify(&code).map(String::from);
            records.push(ArrivalRecord::new(date, code, zone));
        }

        debug!("Fetched {} arrival records", records.len());
        Ok(records)
    }

    /// Count total rows in the arrivals table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM arriving_vehicles", [], |row| {
                    row.get(0)
                })?;
        Ok(count)
    }

    /// Open the database and fetch every arrival record, retrying with
    /// exponential backoff on failure.
    ///
    /// The connection is opened fresh per attempt so that a recovered
    /// database file is picked up.
    ///
    /// # Errors
    ///
    /// Returns the last error once all attempts are exhausted.
    pub fn fetch_with_retry(
        path: &Path,
        zones: &ZoneMap,
        retry: &RetryConfig,
    ) -> Result<Vec<ArrivalRecord>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = Self::open(path).and_then(|db| {
                db.set_busy_timeout(retry.busy_timeout())?;
                db.fetch_arrivals(zones)
            });

            match result {
                Ok(records) => {
                    if attempt > 1 {
                        info!("Fetch succeeded on attempt {attempt}");
                    }
                    return Ok(records);
                }
                Err(err) if attempt < retry.max_attempts => {
                    let delay = retry.backoff_delay(attempt);
                    warn!("Fetch attempt {attempt} failed: {err}; retrying in {delay:?}");
                    thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Insert an arrival row for test seeding.
    #[cfg(test)]
    pub(crate) fn insert_arrival(&self, departure_date: &str, vehicle_code: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO arriving_vehicles (departure_date, vehicle_code) VALUES (?1, ?2)",
            rusqlite::params![departure_date, vehicle_code],
        )?;
        Ok(())
    }
}

/// Parse a departure date from its stored text form.
///
/// Accepts plain `YYYY-MM-DD` as well as datetime strings with that prefix.
fn parse_departure_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
