pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod ingest;
pub mod output;
pub mod reader;

use std::path::Path;

use aggregator::{PivotTable, SheetType};
use ingest::{ColumnNames, Dataset};

/// Reads and ingests a KPI export.
pub fn load_dataset(path: impl AsRef<Path>, names: &ColumnNames) -> error::Result<Dataset> {
    let table = reader::read_table(path)?;
    Ok(ingest::ingest(table, names)?)
}

/// Reads, ingests and pivots a KPI export in one call.
pub fn pivot_file(
    path: impl AsRef<Path>,
    names: &ColumnNames,
    sheet: SheetType,
    hour: Option<u8>,
) -> error::Result<PivotTable> {
    let dataset = load_dataset(path, names)?;
    let mode = aggregator::resolve_mode(sheet, &dataset, hour)?;
    Ok(aggregator::aggregate(&dataset, mode)?)
}
