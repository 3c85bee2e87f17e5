//! Shared "snapshot pipeline" used by every command.
//!
//! fetch -> merge (per dataset) -> snapshot
//!
//! The snapshot is built once, before anything is rendered or served, and is
//! passed around by reference afterwards.

use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::data::{SeriesSource, build_merged};
use crate::domain::{DashboardSnapshot, Dataset, DatasetSpec};
use crate::error::AppError;

/// Fetch and merge the series of one dataset.
pub fn build_dataset<S>(source: &S, spec: DatasetSpec) -> Result<Dataset, AppError>
where
    S: SeriesSource + ?Sized,
{
    let started = Instant::now();
    let table = build_merged(source, &spec.requests())
        .map_err(|e| AppError::new(e.kind(), format!("Dataset '{}': {e}", spec.key)))?;

    info!(
        dataset = spec.key,
        series = spec.series.len(),
        rows = table.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset ready"
    );
    Ok(Dataset { spec, table })
}

/// Build every dataset in order. The first failure aborts the whole snapshot.
pub fn build_snapshot<S>(source: &S, specs: &[DatasetSpec]) -> Result<DashboardSnapshot, AppError>
where
    S: SeriesSource + ?Sized,
{
    let datasets = specs
        .iter()
        .map(|spec| build_dataset(source, *spec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DashboardSnapshot {
        datasets,
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{Observation, SeriesTable, catalog};
    use crate::error::ErrorKind;

    /// Every id answers with the same two months, except the ids in `failing`.
    struct StubSource {
        failing: HashSet<u32>,
    }

    impl SeriesSource for StubSource {
        fn fetch(&self, series_id: u32, label: Option<&str>) -> Result<SeriesTable, AppError> {
            if self.failing.contains(&series_id) {
                return Err(AppError::new(
                    ErrorKind::Http,
                    format!("CBS request for series {series_id} failed with status 500."),
                ));
            }
            let rows = [(2024, 1), (2024, 2)]
                .iter()
                .map(|&(y, m)| Observation {
                    period: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
                    value: series_id as f64 / 1000.0,
                })
                .collect();
            Ok(SeriesTable {
                series_id,
                label: label.unwrap_or("Value").to_string(),
                rows,
            })
        }
    }

    #[test]
    fn snapshot_contains_every_catalog_dataset() {
        let source = StubSource { failing: HashSet::new() };
        let snapshot = build_snapshot(&source, &catalog::ALL).unwrap();

        let keys: Vec<&str> = snapshot.datasets.iter().map(|d| d.spec.key).collect();
        assert_eq!(keys, vec!["trade", "imports", "tech", "region"]);

        let trade = snapshot.dataset("trade").unwrap();
        assert_eq!(trade.table.len(), 2);
        assert_eq!(trade.table.columns.len(), 4);
        assert_eq!(trade.table.column("Imports excl. ships/aircraft/diamonds").unwrap().values, vec![0.077, 0.077]);
    }

    #[test]
    fn one_failing_series_aborts_the_snapshot() {
        let source = StubSource { failing: HashSet::from([11211]) };
        let err = build_snapshot(&source, &catalog::ALL).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Http);
        assert!(err.to_string().starts_with("Dataset 'region':"));
        assert!(err.to_string().contains("series 11211"));
    }

    #[test]
    fn single_dataset_can_be_built_alone() {
        let source = StubSource { failing: HashSet::from([77]) };
        let ds = build_dataset(&source, catalog::EXPORTS_BY_TECH).unwrap();
        assert_eq!(ds.table.labels().collect::<Vec<_>>(), vec![
            "High-tech",
            "Low-tech",
            "Medium-high tech",
            "Medium-low tech"
        ]);
    }
}
