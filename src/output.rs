//! Rendering and persistence for pivot tables.
//!
//! Supports a fixed-width terminal table, JSON serialization, and CSV export.

use anyhow::Result;
use std::io::Write;
use tracing::debug;

use crate::aggregator::PivotTable;
use crate::ingest::ColumnNames;
use csv::WriterBuilder;

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn records<'a>(
    table: &'a PivotTable,
    names: &'a ColumnNames,
) -> impl Iterator<Item = Vec<String>> + 'a {
    std::iter::once(table.header(&names.element, &names.cell)).chain(table.rows.iter().map(
        |row| {
            [row.element.clone(), row.cell.clone(), row.metric.clone()]
                .into_iter()
                .chain(row.values.iter().map(|v| format_value(*v)))
                .collect()
        },
    ))
}

/// Renders the pivot as a left-aligned text table. Empty cells are blank.
pub fn render_table(table: &PivotTable, names: &ColumnNames) -> String {
    let lines: Vec<Vec<String>> = records(table, names).collect();

    let mut widths = vec![0usize; lines.first().map_or(0, Vec::len)];
    for line in &lines {
        for (w, field) in widths.iter_mut().zip(line) {
            *w = (*w).max(field.chars().count());
        }
    }

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let rendered: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(field, &w)| format!("{field:<w$}"))
            .collect();
        out.push_str(rendered.join(" | ").trim_end());
        out.push('\n');

        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    out
}

/// Serializes the pivot as pretty-printed JSON.
pub fn to_json(table: &PivotTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Writes the pivot as CSV: header row, then one record per (element, cell, KPI).
pub fn write_csv<W: Write>(writer: W, table: &PivotTable, names: &ColumnNames) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    for record in records(table, names) {
        writer.write_record(&record)?;
    }
    writer.flush()?;

    debug!(rows = table.rows.len(), "CSV written");
    Ok(())
}

/// Writes the pivot to `path` as CSV, replacing any existing file.
pub fn save_csv(path: &str, table: &PivotTable, names: &ColumnNames) -> Result<()> {
    debug!(path, "Saving CSV report");
    let file = std::fs::File::create(path)?;
    write_csv(file, table, names)
}
