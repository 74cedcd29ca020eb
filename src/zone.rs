//! Zone classification rules.
//!
//! This module maps vehicle (LP) codes to named geographic zones via a
//! data-driven ruleset. The ruleset is a configuration artifact: the built-in
//! default covers the six reference zones, and an alternate ruleset can be
//! loaded from a TOML file without touching any logic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An inclusive range of numeric vehicle codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRange {
    /// First code covered by this range.
    pub start: u32,
    /// Last code covered by this range (inclusive).
    pub end: u32,
}

impl CodeRange {
    /// Create a new inclusive code range.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check whether a numeric code falls inside this range.
    #[must_use]
    pub fn contains(&self, code: u32) -> bool {
        (self.start..=self.end).contains(&code)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Terminal color assigned to a zone's bar in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneColor {
    /// Blue bar.
    Blue,
    /// Red bar.
    Red,
    /// Green bar.
    Green,
    /// Magenta bar.
    Magenta,
    /// Yellow bar.
    Yellow,
    /// Cyan bar.
    Cyan,
    /// White bar (also the fallback for unknown zones).
    #[default]
    White,
}

impl ZoneColor {
    /// Convert to the terminal color used when rendering.
    #[must_use]
    pub fn to_color(self) -> colored::Color {
        match self {
            Self::Blue => colored::Color::Blue,
            Self::Red => colored::Color::Red,
            Self::Green => colored::Color::Green,
            Self::Magenta => colored::Color::Magenta,
            Self::Yellow => colored::Color::Yellow,
            Self::Cyan => colored::Color::Cyan,
            Self::White => colored::Color::White,
        }
    }
}

/// A single classification rule: a named zone and the code ranges it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRule {
    /// The zone name, e.g. `"AlipurBangla"`.
    pub zone: String,
    /// The code ranges this zone covers.
    pub ranges: Vec<CodeRange>,
    /// The chart color for this zone.
    #[serde(default)]
    pub color: ZoneColor,
}

impl ZoneRule {
    /// Check whether a numeric code falls inside any of this rule's ranges.
    #[must_use]
    pub fn matches(&self, code: u32) -> bool {
        self.ranges.iter().any(|range| range.contains(code))
    }
}

/// The active set of zone classification rules.
///
/// The ruleset partitions the known code ranges into named zones; it is
/// deliberately partial over the full code space. Codes outside every range
/// (and non-numeric codes) classify to no zone and are reported under the
/// [`crate::arrival::UNCLASSIFIED`] label downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMap {
    /// The rules, in declaration order. Declaration order is also the
    /// presentation order of the chart.
    #[serde(rename = "rule")]
    pub rules: Vec<ZoneRule>,
}

impl Default for ZoneMap {
    /// The reference ruleset: six zones covering codes 2401-2463.
    fn default() -> Self {
        Self {
            rules: vec![
                ZoneRule {
                    zone: "AlipurBangla".to_string(),
                    ranges: vec![CodeRange::new(2401, 2409)],
                    color: ZoneColor::Blue,
                },
                ZoneRule {
                    zone: "Satiana/Syedwala".to_string(),
                    ranges: vec![CodeRange::new(2410, 2422)],
                    color: ZoneColor::Red,
                },
                ZoneRule {
                    zone: "Shahkot".to_string(),
                    ranges: vec![CodeRange::new(2428, 2431)],
                    color: ZoneColor::Green,
                },
                ZoneRule {
                    zone: "Nankana/Manawala".to_string(),
                    ranges: vec![CodeRange::new(2423, 2427), CodeRange::new(2432, 2437)],
                    color: ZoneColor::Magenta,
                },
                ZoneRule {
                    zone: "Chiniot".to_string(),
                    ranges: vec![CodeRange::new(2449, 2461)],
                    color: ZoneColor::Yellow,
                },
                ZoneRule {
                    zone: "Jhumra".to_string(),
                    ranges: vec![CodeRange::new(2438, 2448), CodeRange::new(2462, 2463)],
                    color: ZoneColor::Cyan,
                },
            ],
        }
    }
}

impl ZoneMap {
    /// Load a ruleset from a TOML file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ZoneRulesRead {
            path: path.to_path_buf(),
            source,
        })?;
        let map: Self = toml::from_str(&raw)?;
        map.validate()?;
        Ok(map)
    }

    /// Validate the ruleset.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule has an empty name or no ranges, a range is
    /// inverted, two rules share a name, or any two ranges overlap.
    pub fn validate(&self) -> Result<()> {
        for rule in &self.rules {
            if rule.zone.trim().is_empty() {
                return Err(Error::zone_rules_invalid("rule with empty zone name"));
            }
            if rule.ranges.is_empty() {
                return Err(Error::zone_rules_invalid(format!(
                    "zone '{}' has no code ranges",
                    rule.zone
                )));
            }
            for range in &rule.ranges {
                if range.start > range.end {
                    return Err(Error::zone_rules_invalid(format!(
                        "zone '{}' has inverted range {}-{}",
                        rule.zone, range.start, range.end
                    )));
                }
            }
        }

        for (i, a) in self.rules.iter().enumerate() {
            for b in &self.rules[i + 1..] {
                if a.zone == b.zone {
                    return Err(Error::zone_rules_invalid(format!(
                        "duplicate zone name '{}'",
                        a.zone
                    )));
                }
            }
        }

        let mut ranges: Vec<(&str, &CodeRange)> = self
            .rules
            .iter()
            .flat_map(|rule| rule.ranges.iter().map(move |r| (rule.zone.as_str(), r)))
            .collect();
        ranges.sort_by_key(|(_, r)| r.start);
        for pair in ranges.windows(2) {
            let (zone_a, a) = pair[0];
            let (zone_b, b) = pair[1];
            if a.overlaps(b) {
                return Err(Error::zone_rules_invalid(format!(
                    "ranges {}-{} ('{zone_a}') and {}-{} ('{zone_b}') overlap",
                    a.start, a.end, b.start, b.end
                )));
            }
        }

        Ok(())
    }

    /// Classify a vehicle code into a zone.
    ///
    /// Classification is deterministic. Non-numeric codes and codes outside
    /// every range return `None`; classification never fails.
    #[must_use]
    pub fn classify(&self, code: &str) -> Option<&str> {
        let numeric: u32 = code.trim().parse().ok()?;
        self.rules
            .iter()
            .find(|rule| rule.matches(numeric))
            .map(|rule| rule.zone.as_str())
    }

    /// Zone names in declaration order.
    #[must_use]
    pub fn zone_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.zone.as_str()).collect()
    }

    /// The terminal color assigned to a zone.
    ///
    /// Unknown zones (including the unclassified label) get the default
    /// color.
    #[must_use]
    pub fn color_for(&self, zone: &str) -> colored::Color {
        self.rules
            .iter()
            .find(|rule| rule.zone == zone)
            .map_or(ZoneColor::default(), |rule| rule.color)
            .to_color()
    }

    /// Number of rules in the ruleset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the ruleset has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
