//! Loads a KPI export from disk into a [`RawTable`].
//!
//! Excel/ODS workbooks are read with `calamine` (first worksheet only),
//! CSV with the `csv` crate, and `.csv.gz` is decompressed on the fly.

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::ReadError;
use crate::ingest::{RawTable, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Workbook,
    Csv,
    CsvGz,
}

fn detect_format(path: &Path) -> Result<Format, ReadError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if name.ends_with(".csv.gz") {
        return Ok(Format::CsvGz);
    }

    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("csv") => Ok(Format::Csv),
        Some("xlsx" | "xlsm" | "xls" | "xlsb" | "ods") => Ok(Format::Workbook),
        _ => Err(ReadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Reads a KPI export, choosing the parser from the file extension.
///
/// # Errors
///
/// Returns an error if the extension is not recognized, the file cannot be
/// opened, or its contents are not valid for the detected format.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable, ReadError> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    debug!(?format, "Reading input file");

    let table = match format {
        Format::Workbook => read_workbook(path)?,
        Format::Csv => read_csv(File::open(path)?)?,
        Format::CsvGz => read_csv(GzDecoder::new(File::open(path)?))?,
    };

    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Input file loaded"
    );
    Ok(table)
}

/// Parses CSV with a header row. Every field is kept as text.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, ReadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(RawValue::from).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn read_workbook(path: &Path) -> Result<RawTable, ReadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows = rows
        .map(|row| row.iter().map(from_cell).collect())
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn from_cell(cell: &Data) -> RawValue {
    match cell {
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Float(f) => RawValue::Number(*f),
        Data::String(s) => RawValue::from(s.as_str()),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(RawValue::Empty, |dt| RawValue::DateTime(round_to_second(dt))),
        Data::DateTimeIso(s) => RawValue::from(s.as_str()),
        _ => RawValue::Empty,
    }
}

/// Excel serial dates are floats; 10:00 can come back as 09:59:59.999.
fn round_to_second(dt: NaiveDateTime) -> NaiveDateTime {
    let rounded = if dt.nanosecond() >= 500_000_000 {
        dt + TimeDelta::seconds(1)
    } else {
        dt
    };
    rounded.with_nanosecond(0).unwrap_or(rounded)
}
