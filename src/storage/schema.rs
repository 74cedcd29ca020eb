//! `SQLite` schema for the arrivals table.
//!
//! The dashboard only reads the arrivals table; the external system that
//! tracks departures owns it. These statements exist for in-memory test
//! databases and for seeding demo data.

/// SQL statement to create the arrivals table.
pub const CREATE_ARRIVALS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS arriving_vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    departure_date TEXT NOT NULL,
    vehicle_code TEXT NOT NULL
)
";

/// SQL statement to create an index on `departure_date` for filtering.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_arriving_vehicles_date ON arriving_vehicles(departure_date)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ARRIVALS_TABLE, CREATE_DATE_INDEX];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_arrivals_table_contains_required_columns() {
        assert!(CREATE_ARRIVALS_TABLE.contains("departure_date TEXT NOT NULL"));
        assert!(CREATE_ARRIVALS_TABLE.contains("vehicle_code TEXT NOT NULL"));
    }
}
