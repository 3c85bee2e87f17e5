//! Merge several labeled series into one wide table.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use crate::data::cbs::SeriesSource;
use crate::domain::{Column, MergedTable, SeriesRequest, SeriesTable};
use crate::error::AppError;

/// Fetch every requested series and inner-join them on period.
///
/// Columns follow the order of `requests`. Series are fetched in parallel; if
/// several fail, the error of the earliest request is returned.
pub fn build_merged<S>(source: &S, requests: &[SeriesRequest]) -> Result<MergedTable, AppError>
where
    S: SeriesSource + ?Sized,
{
    if requests.is_empty() {
        return Err(AppError::config("Cannot build a merged table: no series requested."));
    }

    let mut seen = HashSet::new();
    for req in requests {
        if !seen.insert(req.label.as_str()) {
            return Err(AppError::config(format!(
                "Duplicate series label '{}' in one dataset.",
                req.label
            )));
        }
    }

    let fetched: Vec<Result<SeriesTable, AppError>> = requests
        .par_iter()
        .map(|req| source.fetch(req.series_id, Some(&req.label)))
        .collect();
    let tables = fetched.into_iter().collect::<Result<Vec<_>, _>>()?;

    let mut tables = tables.into_iter();
    // Non-empty was checked above.
    let Some(first) = tables.next() else {
        return Ok(MergedTable::default());
    };

    let merged = tables.fold(MergedTable::from_series(first), |acc, next| {
        inner_join(acc, &MergedTable::from_series(next))
    });

    debug!(
        series = requests.len(),
        rows = merged.len(),
        "merged series on shared periods"
    );
    Ok(merged)
}

/// Keep only periods present in both tables; right-hand columns are appended.
pub fn inner_join(left: MergedTable, right: &MergedTable) -> MergedTable {
    let index: HashMap<_, usize> = right
        .periods
        .iter()
        .enumerate()
        .map(|(i, p)| (*p, i))
        .collect();

    let pairs: Vec<(usize, usize)> = left
        .periods
        .iter()
        .enumerate()
        .filter_map(|(i, p)| index.get(p).map(|&j| (i, j)))
        .collect();

    let periods = pairs.iter().map(|&(i, _)| left.periods[i]).collect();

    let mut columns: Vec<Column> = left
        .columns
        .into_iter()
        .map(|c| Column {
            values: pairs.iter().map(|&(i, _)| c.values[i]).collect(),
            label: c.label,
        })
        .collect();
    columns.extend(right.columns.iter().map(|c| Column {
        label: c.label.clone(),
        values: pairs.iter().map(|&(_, j)| c.values[j]).collect(),
    }));

    MergedTable { periods, columns }
}
