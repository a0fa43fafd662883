//! Error types for each pipeline stage.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Failures while loading a file into a raw table.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Workbook '{0}' contains no worksheet")]
    EmptyWorkbook(String),
}

/// Structural problems found while normalizing a raw table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Invalid file structure: missing mandatory column '{0}'")]
    MissingMandatoryColumn(String),
}

/// Problems that prevent a pivot from being built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Invalid file structure: missing mandatory column '{0}'")]
    InvalidStructure(String),

    #[error("Dataset spans {distinct_dates} dates; an hour (0-23) must be selected")]
    HourRequired { distinct_dates: usize },

    #[error("Hour {0} is out of range (expected 0-23)")]
    HourOutOfRange(u8),
}
