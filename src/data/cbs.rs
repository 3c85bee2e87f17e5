//! CBS series API integration.
//!
//! One blocking GET per series id; the response's first series is turned
//! into a sorted, de-duplicated, unit-scaled `SeriesTable`.

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{DEFAULT_VALUE_LABEL, FetchConfig, Observation, SeriesTable, VALUE_SCALE};
use crate::error::{AppError, ErrorKind};

/// Anything that can produce a series table for an id.
///
/// Implementors must be shareable across threads: the merger fetches the
/// series of one dataset in parallel.
pub trait SeriesSource: Sync {
    fn fetch(&self, series_id: u32, label: Option<&str>) -> Result<SeriesTable, AppError>;
}

pub struct CbsClient {
    client: Client,
    config: FetchConfig,
}

impl CbsClient {
    pub fn new(config: FetchConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl SeriesSource for CbsClient {
    fn fetch(&self, series_id: u32, label: Option<&str>) -> Result<SeriesTable, AppError> {
        let id = series_id.to_string();
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("id", id.as_str()),
                ("startPeriod", self.config.start_period.as_str()),
                ("endPeriod", self.config.end_period.as_str()),
                ("format", "json"),
                ("lang", self.config.lang.as_str()),
            ])
            .send()
            .map_err(|e| {
                AppError::new(ErrorKind::Network, format!("CBS request for series {series_id} failed: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::new(
                ErrorKind::Http,
                format!("CBS request for series {series_id} failed with status {status}."),
            ));
        }

        let body = resp.text().map_err(|e| {
            AppError::new(
                ErrorKind::Network,
                format!("Failed to read CBS response for series {series_id}: {e}"),
            )
        })?;

        let table = parse_series(series_id, label, &body)?;
        debug!(series_id, rows = table.rows.len(), "fetched series");
        Ok(table)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SeriesResponse {
    data_set: DataSet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DataSet {
    series: Vec<SeriesBody>,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    obs: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(rename = "Period", alias = "TimePeriod", default)]
    period: Option<String>,
    #[serde(rename = "Value", default)]
    value: Value,
}

/// Parse a CBS JSON body into a series table.
///
/// Rows whose period or value cannot be parsed are dropped, as are repeated
/// periods (the first occurrence in response order wins). Dropped rows are
/// reported with a single warning per series.
pub fn parse_series(series_id: u32, label: Option<&str>, body: &str) -> Result<SeriesTable, AppError> {
    let response: SeriesResponse = serde_json::from_str(body).map_err(|e| {
        AppError::format(format!("Unexpected CBS response shape for series {series_id}: {e}"))
    })?;

    let series = response.data_set.series.into_iter().next().ok_or_else(|| {
        AppError::format(format!("CBS response for series {series_id} contains no series."))
    })?;

    let total = series.obs.len();
    let mut rows: Vec<Observation> = series
        .obs
        .into_iter()
        .filter_map(|raw| {
            let period = parse_period(raw.period.as_deref()?)?;
            let value = parse_value(&raw.value)? / VALUE_SCALE;
            Some(Observation { period, value })
        })
        .collect();

    // Stable sort keeps response order among equal periods, so dedup keeps the first.
    rows.sort_by_key(|r| r.period);
    rows.dedup_by_key(|r| r.period);

    let dropped = total - rows.len();
    if dropped > 0 {
        warn!(series_id, dropped, total, "dropped unparseable or duplicate observations");
    }

    Ok(SeriesTable {
        series_id,
        label: label.unwrap_or(DEFAULT_VALUE_LABEL).to_string(),
        rows,
    })
}

/// Parse a monthly period into the first day of that month.
///
/// Accepted: `YYYY-MM`, `YYYY-MM-DD` (optionally with a time suffix),
/// `MM-YYYY`, `MM/YYYY`, `YYYY/MM`.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split(['T', ' ']).next()?;
    let parts: Vec<&str> = date_part.split(['-', '/']).collect();

    let (year, month) = match parts.as_slice() {
        [a, b] if a.len() == 4 => (a.parse::<i32>().ok()?, b.parse::<u32>().ok()?),
        [a, b] if b.len() == 4 => (b.parse::<i32>().ok()?, a.parse::<u32>().ok()?),
        [y, m, d] if y.len() == 4 => {
            let full = NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)?;
            return full.with_day0(0);
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Coerce a JSON value (number or numeric string) to a finite float.
fn parse_value(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}
