//! Core arrival record types.
//!
//! This module defines the data structures for representing vehicle-arrival
//! records fetched from the arrivals database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display label for records whose vehicle code no zone rule covers.
///
/// Such records are always counted under this label rather than dropped,
/// so per-zone counts add up to the true record total.
pub const UNCLASSIFIED: &str = "unclassified";

/// A single vehicle-arrival record, tagged with its zone.
///
/// The arrivals table is the source of truth; records are fetched, filtered,
/// aggregated, and discarded on the next refresh. `zone` is `None` when the
/// vehicle code falls outside every rule of the active zone ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// The departure date of the vehicle.
    pub departure_date: NaiveDate,

    /// The vehicle (LP) code used for zone classification.
    pub vehicle_code: String,

    /// The zone this record was classified into, if any rule matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl ArrivalRecord {
    /// Create a new arrival record.
    #[must_use]
    pub fn new(
        departure_date: NaiveDate,
        vehicle_code: impl Into<String>,
        zone: Option<String>,
    ) -> Self {
        Self {
            departure_date,
            vehicle_code: vehicle_code.into(),
            zone,
        }
    }

    /// The zone label used for filtering and aggregation.
    ///
    /// Returns [`UNCLASSIFIED`] when no rule matched the vehicle code.
    #[must_use]
    pub fn zone_label(&self) -> &str {
        self.zone.as_deref().unwrap_or(UNCLASSIFIED)
    }
}
