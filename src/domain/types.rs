//! Shared domain types.
//!
//! Tables are plain owned vectors: they are built once at startup, never
//! mutated afterward, and handed by reference to rendering and serving.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

/// Default CBS series-data endpoint.
pub const DEFAULT_BASE_URL: &str = "https://apis.cbs.gov.il/series/data/list";
pub const DEFAULT_START_PERIOD: &str = "01-2018";
pub const DEFAULT_END_PERIOD: &str = "04-2025";
pub const DEFAULT_LANG: &str = "he";

/// Raw API values are in millions; tables hold billions.
pub const VALUE_SCALE: f64 = 1000.0;

/// Column name used when a series is fetched without a label.
pub const DEFAULT_VALUE_LABEL: &str = "Value";

/// One labeled series to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub label: String,
    pub series_id: u32,
}

impl SeriesRequest {
    pub fn new(label: impl Into<String>, series_id: u32) -> Self {
        Self {
            label: label.into(),
            series_id,
        }
    }
}

/// A single (period, value) pair. `period` is always the first of the month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub period: NaiveDate,
    pub value: f64,
}

/// One fetched series: rows strictly increasing by period, all values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub series_id: u32,
    pub label: String,
    pub rows: Vec<Observation>,
}

impl SeriesTable {
    pub fn periods(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.period)
    }
}

/// One value column of a wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub values: Vec<f64>,
}

/// Wide table keyed by period; every column has `periods.len()` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedTable {
    pub periods: Vec<NaiveDate>,
    pub columns: Vec<Column>,
}

impl MergedTable {
    pub fn from_series(series: SeriesTable) -> Self {
        let (periods, values) = series.rows.into_iter().map(|r| (r.period, r.value)).unzip();
        Self {
            periods,
            columns: vec![Column {
                label: series.label,
                values,
            }],
        }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Values of every column at row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[idx]).collect()
    }

    /// Smallest and largest value across all columns.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.columns.iter().flat_map(|c| c.values.iter().copied());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Static description of one dashboard dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSpec {
    /// Short identifier used by the CLI, CSV file names and the JSON API.
    pub key: &'static str,
    /// Section heading on the dashboard.
    pub title: &'static str,
    pub y_title: &'static str,
    /// Label → series id, in column order.
    pub series: &'static [(&'static str, u32)],
}

impl DatasetSpec {
    pub fn requests(&self) -> Vec<SeriesRequest> {
        self.series
            .iter()
            .map(|&(label, id)| SeriesRequest::new(label, id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub spec: DatasetSpec,
    pub table: MergedTable,
}

/// All datasets fetched at startup.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub datasets: Vec<Dataset>,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn dataset(&self, key: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.spec.key == key)
    }
}

/// Parameters shared by every series request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub start_period: String,
    pub end_period: String,
    pub lang: String,
    /// `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            start_period: DEFAULT_START_PERIOD.to_string(),
            end_period: DEFAULT_END_PERIOD.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: None,
        }
    }
}
