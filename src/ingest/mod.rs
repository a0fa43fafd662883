//! Normalization of a raw KPI export into a [`Dataset`].
//!
//! Headers are trimmed, the period start time is parsed into a timestamp,
//! and the catalog KPIs present in the file are coerced to numbers. Bad
//! timestamps and non-numeric KPI cells are tolerated per row; only a
//! missing identifier or timestamp column fails the whole file.

pub mod coerce;
pub mod timestamp;
pub mod types;

pub use types::{ColumnNames, Dataset, KpiReport, RawTable, RawValue, Reading};

use tracing::{debug, info};

use crate::catalog::eligible_kpis;
use crate::error::IngestError;
use coerce::{to_identifier, to_number};
use timestamp::parse_timestamp;

/// Builds a [`Dataset`] from a raw table.
///
/// # Errors
///
/// Returns [`IngestError::MissingMandatoryColumn`] if the cell, element or
/// timestamp column is absent after header normalization.
#[tracing::instrument(skip_all, fields(rows = table.rows.len(), columns = table.headers.len()))]
pub fn ingest(table: RawTable, names: &ColumnNames) -> Result<Dataset, IngestError> {
    let columns: Vec<String> = table
        .headers
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| IngestError::MissingMandatoryColumn(name.to_string()))
    };

    let cell_idx = position(&names.cell)?;
    let element_idx = position(&names.element)?;
    let timestamp_idx = position(&names.timestamp)?;

    let metrics = eligible_kpis(&columns);
    let metric_idx: Vec<usize> = metrics
        .iter()
        .filter_map(|m| columns.iter().position(|c| c == m))
        .collect();

    let empty = RawValue::Empty;
    let readings: Vec<Reading> = table
        .rows
        .iter()
        .map(|row| {
            let at = |i: usize| row.get(i).unwrap_or(&empty);
            Reading::new(
                to_identifier(at(element_idx)),
                to_identifier(at(cell_idx)),
                parse_timestamp(at(timestamp_idx)),
                metric_idx.iter().map(|&i| to_number(at(i))).collect(),
            )
        })
        .collect();

    let dataset = Dataset::new(columns, names.clone(), metrics, readings);

    let unparsed = dataset.unparsed_timestamps();
    if unparsed > 0 {
        debug!(unparsed, "Rows with unparseable timestamps will be skipped");
    }

    info!(
        rows = dataset.readings().len(),
        metrics = dataset.metrics().len(),
        distinct_dates = dataset.distinct_dates(),
        "Dataset ingested"
    );

    Ok(dataset)
}
