//! Zone and date selection over a fetched record set.
//!
//! Filtering is a pure, stateless projection: it never mutates the held
//! record set and is recomputed from scratch on every pass.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::arrival::ArrivalRecord;

/// The user's current zone and date selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected zone labels (including the unclassified label).
    pub zones: BTreeSet<String>,
    /// Selected departure dates.
    pub dates: BTreeSet<NaiveDate>,
}

impl Selection {
    /// An empty selection, matching nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection covering every zone label and date present in `records`.
    ///
    /// Applying this selection to the same records is the identity.
    #[must_use]
    pub fn all_for(records: &[ArrivalRecord]) -> Self {
        Self {
            zones: available_zones(records),
            dates: available_dates(records),
        }
    }

    /// Project `records` down to those matching the selection.
    ///
    /// A record is kept when its zone label is in the selected zone set AND
    /// its departure date is in the selected date set. An empty date set
    /// therefore matches nothing; the reference implementation behaves the
    /// same way, and callers that want "no date restriction" must select
    /// every available date explicitly.
    #[must_use]
    pub fn apply(&self, records: &[ArrivalRecord]) -> Vec<ArrivalRecord> {
        records
            .iter()
            .filter(|record| {
                self.zones.contains(record.zone_label())
                    && self.dates.contains(&record.departure_date)
            })
            .cloned()
            .collect()
    }

    /// Toggle a zone label in the selection. Returns `true` if the zone is
    /// now selected.
    pub fn toggle_zone(&mut self, zone: &str) -> bool {
        if self.zones.remove(zone) {
            false
        } else {
            self.zones.insert(zone.to_string());
            true
        }
    }

    /// Toggle a date in the selection. Returns `true` if the date is now
    /// selected.
    pub fn toggle_date(&mut self, date: NaiveDate) -> bool {
        if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        }
    }
}

/// Every zone label present in `records`, in sorted order.
#[must_use]
pub fn available_zones(records: &[ArrivalRecord]) -> BTreeSet<String> {
    records
        .iter()
        .map(|record| record.zone_label().to_string())
        .collect()
}

/// Every departure date present in `records`, in sorted order.
#[must_use]
pub fn available_dates(records: &[ArrivalRecord]) -> BTreeSet<NaiveDate> {
    records.iter().map(|record| record.departure_date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn sample_records() -> Vec<ArrivalRecord> {
        vec![
            ArrivalRecord::new(date("2024-11-20"), "2401", Some("AlipurBangla".into())),
            ArrivalRecord::new(date("2024-11-20"), "2410", Some("Satiana/Syedwala".into())),
            ArrivalRecord::new(date("2024-11-21"), "2402", Some("AlipurBangla".into())),
            ArrivalRecord::new(date("2024-11-21"), "9999", None),
        ]
    }

    #[test]
    fn test_identity_with_full_selection() {
        let records = sample_records();
        let selection = Selection::all_for(&records);
        assert_eq!(selection.apply(&records), records);
    }

    #[test]
    fn test_empty_date_set_matches_nothing() {
        // Documented behavior carried over from the reference: AND with an
        // empty date set yields the empty set.
        let records = sample_records();
        let mut selection = Selection::all_for(&records);
        selection.dates.clear();

        assert!(selection.apply(&records).is_empty());
    }

    #[test]
    fn test_empty_zone_set_matches_nothing() {
        let records = sample_records();
        let mut selection = Selection::all_for(&records);
        selection.zones.clear();

        assert!(selection.apply(&records).is_empty());
    }

    #[test]
    fn test_filter_by_zone() {
        let records = sample_records();
        let mut selection = Selection::all_for(&records);
        selection.zones.retain(|zone| zone == "AlipurBangla");

        let filtered = selection.apply(&records);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.zone_label() == "AlipurBangla"));
    }

    #[test]
    fn test_filter_by_date() {
        let records = sample_records();
        let mut selection = Selection::all_for(&records);
        selection.dates.retain(|d| *d == date("2024-11-20"));

        let filtered = selection.apply(&records);
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .iter()
            .all(|r| r.departure_date == date("2024-11-20")));
    }

    #[test]
    fn test_unclassified_is_selectable() {
        let records = sample_records();
        let mut selection = Selection::all_for(&records);
        selection.zones.retain(|zone| zone == "unclassified");

        let filtered = selection.apply(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].vehicle_code, "9999");
    }

    #[test]
    fn test_toggle_zone() {
        let mut selection = Selection::new();
        assert!(selection.toggle_zone("Shahkot"));
        assert!(selection.zones.contains("Shahkot"));
        assert!(!selection.toggle_zone("Shahkot"));
        assert!(!selection.zones.contains("Shahkot"));
    }

    #[test]
    fn test_toggle_date() {
        let mut selection = Selection::new();
        let d = date("2024-11-20");
        assert!(selection.toggle_date(d));
        assert!(!selection.toggle_date(d));
        assert!(selection.dates.is_empty());
    }

    #[test]
    fn test_available_zones_includes_unclassified() {
        let records = sample_records();
        let zones = available_zones(&records);
        assert!(zones.contains("AlipurBangla"));
        assert!(zones.contains("unclassified"));
        assert_eq!(zones.len(), 3);
    }

    #[test]
    fn test_available_dates() {
        let records = sample_records();
        let dates = available_dates(&records);
        assert_eq!(dates.len(), 2);
        assert!(dates.contains(&date("2024-11-20")));
    }

    #[test]
    fn test_apply_on_empty_records() {
        let selection = Selection::all_for(&[]);
        assert!(selection.zones.is_empty());
        assert!(selection.dates.is_empty());
        assert!(selection.apply(&[]).is_empty());
    }
}
