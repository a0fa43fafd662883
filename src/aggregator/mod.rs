//! KPI pivoting by cell and calendar bucket.
//!
//! [`resolve_mode`] turns the caller's sheet type into an
//! [`AggregationMode`], [`aggregate`] groups and sums the readings, and the
//! reshape step leaves a table keyed by (element, cell, KPI) with one column
//! per date or per date and hour.

pub mod mode;
pub mod pivot;
mod reshape;
pub mod types;

pub use mode::resolve_mode;
pub use pivot::aggregate;
pub use types::{AggregationMode, Bucket, PivotRow, PivotTable, SheetType};
