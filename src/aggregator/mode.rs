use tracing::debug;

use super::types::{AggregationMode, SheetType};
use crate::error::AggregateError;
use crate::ingest::Dataset;

/// Picks the aggregation mode for a sheet type.
///
/// "Continue" resolves to hourly columns when the whole dataset covers exactly
/// one date, and otherwise needs `hour`. The date count is always taken over
/// every reading in `dataset`, never over a filtered subset.
pub fn resolve_mode(
    sheet: SheetType,
    dataset: &Dataset,
    hour: Option<u8>,
) -> Result<AggregationMode, AggregateError> {
    let mode = match sheet {
        SheetType::CellDay => AggregationMode::DayCell,
        SheetType::Continue => {
            let distinct_dates = dataset.distinct_dates();
            if distinct_dates == 1 {
                AggregationMode::HourCellSingleDay
            } else {
                match hour {
                    Some(h) if h <= 23 => AggregationMode::HourCellFiltered { hour: h },
                    Some(h) => return Err(AggregateError::HourOutOfRange(h)),
                    None => return Err(AggregateError::HourRequired { distinct_dates }),
                }
            }
        }
    };

    debug!(sheet = %sheet, ?mode, "Aggregation mode resolved");
    Ok(mode)
}
