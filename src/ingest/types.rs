//! Data types shared by the reader, the ingestor and the aggregator.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeSet;

/// A single cell as it came out of the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(s.to_string())
        }
    }
}

/// A header row plus data rows, before any normalization.
///
/// Rows may be shorter than the header; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawValue>>) -> Self {
        Self { headers, rows }
    }
}

/// Names of the identifier and timestamp columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub timestamp: String,
    pub cell: String,
    pub element: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            timestamp: "Period start time".to_string(),
            cell: "LNCEL name".to_string(),
            element: "MRBTS name".to_string(),
        }
    }
}

/// One normalized input row.
///
/// `values` is aligned with [`Dataset::metrics`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub element: Option<String>,
    pub cell: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub values: Vec<Option<f64>>,
}

impl Reading {
    pub fn new(
        element: Option<String>,
        cell: Option<String>,
        timestamp: Option<NaiveDateTime>,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            element,
            cell,
            timestamp,
            values,
        }
    }

    /// Calendar day of the timestamp, if it parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Hour of day (0-23) of the timestamp, if it parsed.
    pub fn hour(&self) -> Option<u8> {
        self.timestamp.map(|ts| ts.hour() as u8)
    }
}

/// The ingestor's output: normalized headers, eligible KPIs and readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub(crate) columns: Vec<String>,
    pub(crate) names: ColumnNames,
    pub(crate) metrics: Vec<String>,
    pub(crate) readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(
        columns: Vec<String>,
        names: ColumnNames,
        metrics: Vec<String>,
        readings: Vec<Reading>,
    ) -> Self {
        Self {
            columns,
            names,
            metrics,
            readings,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn names(&self) -> &ColumnNames {
        &self.names
    }

    /// Eligible KPI names, in catalog order.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of distinct calendar days across every reading. Unparsed
    /// timestamps are not counted.
    pub fn distinct_dates(&self) -> usize {
        self.readings
            .iter()
            .filter_map(Reading::date)
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn unparsed_timestamps(&self) -> usize {
        self.readings
            .iter()
            .filter(|r| r.timestamp.is_none())
            .count()
    }
}

/// KPI validation summary for an ingested file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    pub eligible: Vec<String>,
    pub missing: Vec<String>,
    pub rows: usize,
    pub distinct_dates: usize,
    pub unparsed_timestamps: usize,
}

impl KpiReport {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            eligible: dataset.metrics.clone(),
            missing: crate::catalog::missing_kpis(&dataset.columns),
            rows: dataset.readings.len(),
            distinct_dates: dataset.distinct_dates(),
            unparsed_timestamps: dataset.unparsed_timestamps(),
        }
    }
}
