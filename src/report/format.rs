//! Plain-text rendering of merged datasets for the terminal.

use crate::domain::{DashboardSnapshot, Dataset};

const LABEL_WIDTH: usize = 22;

/// One line per dataset: key, row count, covered periods.
pub fn format_snapshot_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== trade-dash snapshot ({}) ===\n",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
    ));
    for ds in &snapshot.datasets {
        let span = match (ds.table.periods.first(), ds.table.periods.last()) {
            (Some(first), Some(last)) => format!("{} .. {}", first.format("%Y-%m"), last.format("%Y-%m")),
            _ => "no overlapping periods".to_string(),
        };
        out.push_str(&format!(
            "{:<8} rows={:<4} cols={} {span}\n",
            ds.spec.key,
            ds.table.len(),
            ds.table.columns.len()
        ));
    }
    out
}

/// Render one dataset as an aligned table, newest period last.
pub fn format_dataset(dataset: &Dataset) -> String {
    let table = &dataset.table;
    let mut out = String::new();
    out.push_str(&format!("{} [{}]\n", dataset.spec.title, dataset.spec.key));

    let headers: Vec<String> = table.labels().map(|l| truncate(l, LABEL_WIDTH)).collect();
    let widths: Vec<usize> = headers.iter().map(|h| h.chars().count().max(10)).collect();

    let mut header = format!("{:<8}", "period");
    for (h, &w) in headers.iter().zip(&widths) {
        header.push_str(&format!(" {h:>w$}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = format!("{:-<8}", "");
    for &w in &widths {
        rule.push_str(&format!(" {:-<w$}", ""));
    }
    out.push_str(&rule);
    out.push('\n');

    for (idx, period) in table.periods.iter().enumerate() {
        let mut line = format!("{:<8}", period.format("%Y-%m").to_string());
        for (value, &w) in table.row(idx).iter().zip(&widths) {
            line.push_str(&format!(" {value:>w$.3}"));
        }
        out.push_str(&line);
        out.push('\n');
    }

    if table.is_empty() {
        out.push_str("(no overlapping observations)\n");
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::domain::{Column, MergedTable, catalog};

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn region_dataset() -> Dataset {
        Dataset {
            spec: catalog::EXPORTS_BY_REGION,
            table: MergedTable {
                periods: vec![month(2024, 1), month(2024, 2)],
                columns: vec![
                    Column { label: "USA (SA)".to_string(), values: vec![1.25, 1.5] },
                    Column { label: "EU (SA)".to_string(), values: vec![2.0, 2.125] },
                ],
            },
        }
    }

    #[test]
    fn format_dataset_aligns_columns() {
        let txt = format_dataset(&region_dataset());
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].ends_with("[region]"));
        assert_eq!(lines[1], "period     USA (SA)    EU (SA)");
        assert_eq!(lines[3], "2024-01       1.250      2.000");
        assert_eq!(lines[4], "2024-02       1.500      2.125");
    }

    #[test]
    fn format_dataset_marks_empty_tables() {
        let mut ds = region_dataset();
        ds.table = MergedTable::default();
        assert!(format_dataset(&ds).contains("no overlapping observations"));
    }

    #[test]
    fn summary_lists_every_dataset() {
        let snapshot = DashboardSnapshot {
            datasets: vec![region_dataset()],
            fetched_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        };
        let txt = format_snapshot_summary(&snapshot);
        assert!(txt.contains("2025-05-01 12:00 UTC"));
        assert!(txt.contains("region   rows=2    cols=2 2024-01 .. 2024-02"));
    }

    #[test]
    fn truncate_marks_cut_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd.");
    }
}
