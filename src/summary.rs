//! Per-zone aggregation of filtered arrival records.
//!
//! Zone counts are derived values: recomputed on every filter pass and never
//! persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::arrival::{ArrivalRecord, UNCLASSIFIED};
use crate::zone::ZoneMap;

/// The record count for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    /// The zone label.
    pub zone: String,
    /// Number of records classified into this zone.
    pub count: u64,
}

/// The aggregated view of a filtered record set.
///
/// Invariant: the per-zone counts sum to `total`, which equals the filtered
/// record count; unclassified records are counted, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSummary {
    /// Per-zone counts in presentation order. Zones with no records produce
    /// no entry.
    pub counts: Vec<ZoneCount>,
    /// Grand total across all zones.
    pub total: u64,
}

impl ZoneSummary {
    /// Sum of the per-zone counts. Always equals `total`.
    #[must_use]
    pub fn counted(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}

/// Group records by zone label and count them.
///
/// Presentation order is stable and reproducible: ruleset declaration order
/// first, then labels outside the ruleset lexicographically, then the
/// unclassified label last.
#[must_use]
pub fn summarize(records: &[ArrivalRecord], zones: &ZoneMap) -> ZoneSummary {
    let mut by_zone: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *by_zone.entry(record.zone_label()).or_default() += 1;
    }

    let total = u64::try_from(records.len()).unwrap_or(u64::MAX);
    let unclassified = by_zone.remove(UNCLASSIFIED);

    let mut counts = Vec::with_capacity(by_zone.len() + 1);
    for name in zones.zone_names() {
        if let Some(count) = by_zone.remove(name) {
            counts.push(ZoneCount {
                zone: name.to_string(),
                count,
            });
        }
    }
    // Labels outside the ruleset, in BTreeMap (lexicographic) order
    for (name, count) in by_zone {
        counts.push(ZoneCount {
            zone: name.to_string(),
            count,
        });
    }
    if let Some(count) = unclassified {
        counts.push(ZoneCount {
            zone: UNCLASSIFIED.to_string(),
            count,
        });
    }

    ZoneSummary { counts, total }
}
