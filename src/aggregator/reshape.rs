//! Moves the metric from the column axis onto the row axis.
//!
//! Grouping yields `(element, cell) x (bucket, metric)`. The report wants
//! `(element, cell, metric) x bucket`: one flat set of bucket columns and the
//! metric name as a row attribute. Guarantees of [`stack_metrics`]:
//!
//! - columns are every bucket seen by any row key, ascending;
//! - rows ascend by (element, cell), metrics in the order given;
//! - each grouped row key yields exactly one row per metric;
//! - a position with no contributing number is `None`, never `0`.

use std::collections::BTreeSet;

use super::pivot::WidePivot;
use super::types::{AggregationMode, Bucket, PivotRow, PivotTable};

pub(crate) fn stack_metrics(wide: WidePivot, mode: AggregationMode) -> PivotTable {
    let buckets: Vec<Bucket> = wide
        .cells
        .values()
        .flat_map(|by_bucket| by_bucket.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut rows = Vec::with_capacity(wide.cells.len() * wide.metrics.len());

    for ((element, cell), by_bucket) in wide.cells {
        for (m, metric) in wide.metrics.iter().enumerate() {
            let values = buckets
                .iter()
                .map(|b| by_bucket.get(b).and_then(|sums| sums[m].value()))
                .collect();

            rows.push(PivotRow {
                element: element.clone(),
                cell: cell.clone(),
                metric: metric.clone(),
                values,
            });
        }
    }

    PivotTable {
        mode,
        buckets,
        rows,
    }
}
