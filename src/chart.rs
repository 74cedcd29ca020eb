//! Terminal rendering of zone summaries.
//!
//! One bar per zone in presentation order, colored per the ruleset, with the
//! count as a label and the grand total underneath.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::arrival::UNCLASSIFIED;
use crate::config::DisplayConfig;
use crate::summary::{ZoneCount, ZoneSummary};
use crate::zone::ZoneMap;

/// Chart title, mirroring the dashboard heading.
const CHART_TITLE: &str = "Area wise on-the-way statistics";

/// Rendering options for the bar chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    /// Width of the longest bar in characters.
    pub width: usize,
    /// Render the bar for unclassified records. The total always includes
    /// them.
    pub show_unclassified: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 40,
            show_unclassified: true,
        }
    }
}

impl From<&DisplayConfig> for ChartOptions {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            width: display.chart_width,
            show_unclassified: display.show_unclassified,
        }
    }
}

/// Render a zone summary as a colored horizontal bar chart.
#[must_use]
pub fn render_chart(summary: &ZoneSummary, zones: &ZoneMap, options: &ChartOptions) -> String {
    let visible: Vec<&ZoneCount> = summary
        .counts
        .iter()
        .filter(|count| options.show_unclassified || count.zone != UNCLASSIFIED)
        .collect();

    let mut out = String::new();
    out.push_str(CHART_TITLE);
    out.push_str("\n\n");

    if visible.is_empty() {
        out.push_str("  (no records match the current selection)\n");
    } else {
        let max = visible.iter().map(|c| c.count).max().unwrap_or(0);
        let label_width = visible.iter().map(|c| c.zone.len()).max().unwrap_or(0);

        for count in visible {
            let bar = "\u{2588}".repeat(bar_length(count.count, max, options.width));
            let colored_bar = bar.color(zones.color_for(&count.zone));
            out.push_str(&format!(
                "  {:<label_width$}  {} {}\n",
                count.zone, colored_bar, count.count
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!("Total on the way: {}\n", summary.total));
    out
}

/// Render a zone summary as a plain table.
#[must_use]
pub fn render_table(summary: &ZoneSummary, options: &ChartOptions) -> String {
    let rows: Vec<SummaryRow> = summary
        .counts
        .iter()
        .filter(|count| options.show_unclassified || count.zone != UNCLASSIFIED)
        .map(|count| SummaryRow {
            zone: count.zone.clone(),
            count: count.count,
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());

    format!("{table}\nTotal on the way: {}\n", summary.total)
}

/// Render the active zone ruleset as a table.
#[must_use]
pub fn render_rules(zones: &ZoneMap) -> String {
    let rows: Vec<RuleRow> = zones
        .rules
        .iter()
        .map(|rule| RuleRow {
            zone: rule.zone.clone(),
            ranges: rule
                .ranges
                .iter()
                .map(|range| format!("{}-{}", range.start, range.end))
                .collect::<Vec<_>>()
                .join(", "),
            color: format!("{:?}", rule.color).to_lowercase(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Scale a count to a bar length, keeping nonzero counts visible.
fn bar_length(count: u64, max: u64, width: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    let width_u64 = u64::try_from(width).unwrap_or(u64::MAX);
    let scaled = count.saturating_mul(width_u64) / max;
    usize::try_from(scaled.max(1)).unwrap_or(width)
}

#[derive(Debug, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Count")]
    count: u64,
}

#[derive(Debug, Tabled)]
struct RuleRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Code ranges")]
    ranges: String,
    #[tabled(rename = "Color")]
    color: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::ZoneCount;

    fn sample_summary() -> ZoneSummary {
        ZoneSummary {
            counts: vec![
                ZoneCount {
                    zone: "AlipurBangla".to_string(),
                    count: 3,
                },
                ZoneCount {
                    zone: "Chiniot".to_string(),
                    count: 1,
                },
                ZoneCount {
                    zone: UNCLASSIFIED.to_string(),
                    count: 2,
                },
            ],
            total: 6,
        }
    }

    fn plain_chart(summary: &ZoneSummary, options: &ChartOptions) -> String {
        colored::control::set_override(false);
        render_chart(summary, &ZoneMap::default(), options)
    }

    #[test]
    fn test_chart_contains_zones_and_total() {
        let chart = plain_chart(&sample_summary(), &ChartOptions::default());
        assert!(chart.contains(CHART_TITLE));
        assert!(chart.contains("AlipurBangla"));
        assert!(chart.contains("Chiniot"));
        assert!(chart.contains(UNCLASSIFIED));
        assert!(chart.contains("Total on the way: 6"));
    }

    #[test]
    fn test_chart_hides_unclassified_but_keeps_total() {
        let options = ChartOptions {
            show_unclassified: false,
            ..ChartOptions::default()
        };
        let chart = plain_chart(&sample_summary(), &options);
        assert!(!chart.contains(UNCLASSIFIED));
        assert!(chart.contains("Total on the way: 6"));
    }

    #[test]
    fn test_chart_empty_summary() {
        let summary = ZoneSummary {
            counts: vec![],
            total: 0,
        };
        let chart = plain_chart(&summary, &ChartOptions::default());
        assert!(chart.contains("no records match"));
        assert!(chart.contains("Total on the way: 0"));
    }

    #[test]
    fn test_longest_bar_fills_the_width() {
        let options = ChartOptions {
            width: 10,
            show_unclassified: true,
        };
        let chart = plain_chart(&sample_summary(), &options);
        let longest = "\u{2588}".repeat(10);
        assert!(chart.contains(&longest));
        assert!(!chart.contains(&"\u{2588}".repeat(11)));
    }

    #[test]
    fn test_bar_length_scaling() {
        assert_eq!(bar_length(0, 10, 40), 0);
        assert_eq!(bar_length(10, 10, 40), 40);
        assert_eq!(bar_length(5, 10, 40), 20);
        // Nonzero counts always get a visible bar
        assert_eq!(bar_length(1, 1000, 40), 1);
        assert_eq!(bar_length(0, 0, 40), 0);
    }

    #[test]
    fn test_table_contains_rows_and_total() {
        let table = render_table(&sample_summary(), &ChartOptions::default());
        assert!(table.contains("Zone"));
        assert!(table.contains("Count"));
        assert!(table.contains("AlipurBangla"));
        assert!(table.contains("Total on the way: 6"));
    }

    #[test]
    fn test_table_hides_unclassified() {
        let options = ChartOptions {
            show_unclassified: false,
            ..ChartOptions::default()
        };
        let table = render_table(&sample_summary(), &options);
        assert!(!table.contains(UNCLASSIFIED));
    }

    #[test]
    fn test_render_rules() {
        let rules = render_rules(&ZoneMap::default());
        assert!(rules.contains("AlipurBangla"));
        assert!(rules.contains("2401-2409"));
        assert!(rules.contains("blue"));
        assert!(rules.contains("2438-2448, 2462-2463"));
    }

    #[test]
    fn test_options_from_display_config() {
        let display = DisplayConfig {
            chart_width: 25,
            show_unclassified: false,
        };
        let options = ChartOptions::from(&display);
        assert_eq!(options.width, 25);
        assert!(!options.show_unclassified);
    }
}
