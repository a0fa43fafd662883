//! Data types used by the aggregation pipeline.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The report layout requested by the caller, before the dataset is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetType {
    /// "BBH (Cell Day)": one column per day.
    CellDay,
    /// "Continue (Hour / Day)": hourly when the file covers one day,
    /// otherwise a single selected hour across days.
    Continue,
}

impl SheetType {
    pub fn label(&self) -> &'static str {
        match self {
            SheetType::CellDay => "BBH (Cell Day)",
            SheetType::Continue => "Continue (Hour / Day)",
        }
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SheetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BBH (Cell Day)" | "bbh" | "cell-day" => Ok(SheetType::CellDay),
            "Continue (Hour / Day)" | "continue" | "hour-day" => Ok(SheetType::Continue),
            other => Err(format!(
                "unknown sheet type '{other}' (expected 'BBH (Cell Day)' or 'Continue (Hour / Day)')"
            )),
        }
    }
}

/// How readings are bucketed into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AggregationMode {
    /// One column per date.
    DayCell,
    /// One column per (date, hour); the file covers a single date.
    HourCellSingleDay,
    /// Only readings at `hour` are kept, then one column per date.
    HourCellFiltered { hour: u8 },
}

impl AggregationMode {
    /// Completion message shown to the analyst.
    pub fn summary(&self) -> String {
        match self {
            AggregationMode::DayCell => "Day Cell Level KPI Generated".to_string(),
            AggregationMode::HourCellSingleDay => "Hour Cell Level KPI Generated".to_string(),
            AggregationMode::HourCellFiltered { hour } => format!("Hour {hour} KPI Generated"),
        }
    }
}

/// A column key of the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Day(NaiveDate),
    DayHour(NaiveDate, u8),
}

impl Bucket {
    pub fn hour(&self) -> Option<u8> {
        match self {
            Bucket::Day(_) => None,
            Bucket::DayHour(_, h) => Some(*h),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Bucket::DayHour(d, h) => write!(f, "{} {:02}:00", d.format("%Y-%m-%d"), h),
        }
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One output line: a KPI for one cell across every bucket.
///
/// `values` is aligned with [`PivotTable::buckets`]; `None` means no reading
/// contributed a number to that bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub element: String,
    pub cell: String,
    pub metric: String,
    pub values: Vec<Option<f64>>,
}

/// The reshaped aggregation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub mode: AggregationMode,
    pub buckets: Vec<Bucket>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Column titles: the three row attributes followed by bucket labels.
    pub fn header(&self, element_title: &str, cell_title: &str) -> Vec<String> {
        [element_title, cell_title, "KPI"]
            .into_iter()
            .map(String::from)
            .chain(self.buckets.iter().map(Bucket::to_string))
            .collect()
    }

    pub fn row(&self, element: &str, cell: &str, metric: &str) -> Option<&PivotRow> {
        self.rows
            .iter()
            .find(|r| r.element == element && r.cell == cell && r.metric == metric)
    }

    /// The aggregated value at one (row key, bucket) position.
    pub fn value(&self, element: &str, cell: &str, metric: &str, bucket: &Bucket) -> Option<f64> {
        let col = self.buckets.iter().position(|b| b == bucket)?;
        self.row(element, cell, metric)?.values.get(col).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
