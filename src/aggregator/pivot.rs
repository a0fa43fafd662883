use std::collections::BTreeMap;
use tracing::info;

use super::reshape::stack_metrics;
use super::types::{AggregationMode, Bucket, PivotTable};
use crate::error::AggregateError;
use crate::ingest::{Dataset, Reading};

/// (element, cell)
pub(crate) type RowKey = (String, String);

/// Running sum that stays empty until a number is added.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Sum(Option<f64>);

impl Sum {
    pub(crate) fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.0 = Some(self.0.unwrap_or(0.0) + v);
        }
    }

    pub(crate) fn value(&self) -> Option<f64> {
        self.0
    }
}

/// Grouped sums with the metric still on the column axis:
/// row key -> bucket -> one [`Sum`] per metric, aligned with `metrics`.
#[derive(Debug, Clone, Default)]
pub(crate) struct WidePivot {
    pub(crate) metrics: Vec<String>,
    pub(crate) cells: BTreeMap<RowKey, BTreeMap<Bucket, Vec<Sum>>>,
}

fn bucket_for(mode: AggregationMode, reading: &Reading) -> Option<Bucket> {
    let date = reading.date()?;
    let hour = reading.hour()?;

    match mode {
        AggregationMode::DayCell => Some(Bucket::Day(date)),
        AggregationMode::HourCellSingleDay => Some(Bucket::DayHour(date, hour)),
        AggregationMode::HourCellFiltered { hour: wanted } => {
            (hour == wanted).then_some(Bucket::Day(date))
        }
    }
}

/// Groups readings by row key and bucket and sums each metric.
///
/// Readings without a parsed timestamp or without both identifiers are
/// dropped, as are readings outside the selected hour.
pub(crate) fn group(dataset: &Dataset, mode: AggregationMode) -> WidePivot {
    let metrics = dataset.metrics().to_vec();
    let mut cells: BTreeMap<RowKey, BTreeMap<Bucket, Vec<Sum>>> = BTreeMap::new();

    for reading in dataset.readings() {
        let (Some(element), Some(cell)) = (&reading.element, &reading.cell) else {
            continue;
        };
        let Some(bucket) = bucket_for(mode, reading) else {
            continue;
        };

        let sums = cells
            .entry((element.clone(), cell.clone()))
            .or_default()
            .entry(bucket)
            .or_insert_with(|| vec![Sum::default(); metrics.len()]);

        for (sum, value) in sums.iter_mut().zip(&reading.values) {
            sum.add(*value);
        }
    }

    WidePivot { metrics, cells }
}

/// Builds the KPI pivot for `dataset` under `mode`.
///
/// # Errors
///
/// Returns [`AggregateError::InvalidStructure`] if the dataset lacks its
/// cell or element column, and [`AggregateError::HourOutOfRange`] for a
/// filtered mode with an hour above 23.
#[tracing::instrument(skip(dataset), fields(rows = dataset.readings().len()))]
pub fn aggregate(dataset: &Dataset, mode: AggregationMode) -> Result<PivotTable, AggregateError> {
    let names = dataset.names();
    for column in [&names.cell, &names.element] {
        if !dataset.has_column(column) {
            return Err(AggregateError::InvalidStructure(column.clone()));
        }
    }

    if let AggregationMode::HourCellFiltered { hour } = mode {
        if hour > 23 {
            return Err(AggregateError::HourOutOfRange(hour));
        }
    }

    let table = stack_metrics(group(dataset, mode), mode);

    info!(
        buckets = table.buckets.len(),
        rows = table.rows.len(),
        "{}",
        mode.summary()
    );

    Ok(table)
}
