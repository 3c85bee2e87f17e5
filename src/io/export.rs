//! Write the rendered page and the merged datasets to disk.
//!
//! CSV files are one per dataset, `period,<label>,...`, meant for spreadsheets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{DashboardSnapshot, Dataset};
use crate::error::AppError;

/// Write the dashboard HTML.
pub fn write_html(path: &Path, html: &str) -> Result<(), AppError> {
    fs::write(path, html)
        .map_err(|e| AppError::io(format!("Failed to write dashboard '{}': {e}", path.display())))
}

/// Write one dataset as CSV.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create CSV '{}': {e}", path.display())))?;
    let table = &dataset.table;

    let header = std::iter::once("period").chain(table.labels());
    writer
        .write_record(header)
        .map_err(|e| AppError::io(format!("Failed to write CSV header: {e}")))?;

    for (idx, period) in table.periods.iter().enumerate() {
        let mut record = vec![period.format("%Y-%m").to_string()];
        record.extend(table.row(idx).iter().map(|v| v.to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::io(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush CSV '{}': {e}", path.display())))
}

/// Write `<key>.csv` for every dataset into `dir`, creating it if needed.
pub fn write_snapshot_csvs(dir: &Path, snapshot: &DashboardSnapshot) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(snapshot.datasets.len());
    for dataset in &snapshot.datasets {
        let path = dir.join(format!("{}.csv", dataset.spec.key));
        write_dataset_csv(&path, dataset)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::domain::{Column, MergedTable, catalog};

    fn dataset() -> Dataset {
        Dataset {
            spec: catalog::EXPORTS_BY_TECH,
            table: MergedTable {
                periods: vec![
                    NaiveDate::from_ymd_opt(2019, 11, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
                ],
                columns: vec![
                    Column { label: "High-tech".to_string(), values: vec![4.5, 4.75] },
                    Column { label: "Low, tech".to_string(), values: vec![0.5, 0.25] },
                ],
            },
        }
    }

    #[test]
    fn dataset_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tech.csv");
        write_dataset_csv(&path, &dataset()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "period,High-tech,\"Low, tech\"\n2019-11,4.5,0.5\n2019-12,4.75,0.25\n"
        );
    }

    #[test]
    fn csv_quotes_embedded_quotes_and_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.csv");
        let mut ds = dataset();
        ds.table.columns[0].label = "say \"hi\"".to_string();
        ds.table.columns[1].label = "two\nlines".to_string();
        write_dataset_csv(&path, &ds).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("period,\"say \"\"hi\"\"\",\"two\nlines\"\n"));
    }

    #[test]
    fn snapshot_csvs_are_named_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let snapshot = DashboardSnapshot {
            datasets: vec![dataset()],
            fetched_at: Utc::now(),
        };

        let written = write_snapshot_csvs(&out, &snapshot).unwrap();
        assert_eq!(written, vec![out.join("tech.csv")]);
        assert!(written[0].exists());
    }

    #[test]
    fn write_html_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_html(&dir.path().join("missing/page.html"), "<html></html>").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
