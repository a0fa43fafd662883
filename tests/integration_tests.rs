use chrono::{NaiveDate, NaiveDateTime, Timelike};
use lte_kpi_pivot::aggregator::{
    AggregationMode, Bucket, PivotTable, SheetType, aggregate, resolve_mode,
};
use lte_kpi_pivot::catalog::KPI_CATALOG;
use lte_kpi_pivot::error::{AggregateError, Error, IngestError, ReadError};
use lte_kpi_pivot::ingest::{ColumnNames, Dataset, KpiReport, RawTable, RawValue, ingest};
use lte_kpi_pivot::reader::read_table;
use lte_kpi_pivot::{load_dataset, pivot_file};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_lte_kpi.csv");
const XLSX_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample_lte_kpi.xlsx");
const EMPTY_SHEET: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/empty_sheet.xlsx");
const NO_SHEETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/no_sheets.ods");

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|v| RawValue::from(*v)).collect())
            .collect(),
    )
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn single_row() -> Dataset {
    let raw = table(
        &["Period start time", "MRBTS name", "LNCEL name", "Average CQI"],
        &[&["2025-01-01 10:00:00", "E1", "C1", "7"]],
    );
    ingest(raw, &ColumnNames::default()).unwrap()
}

fn run(dataset: &Dataset, sheet: SheetType, hour: Option<u8>) -> PivotTable {
    let mode = resolve_mode(sheet, dataset, hour).unwrap();
    aggregate(dataset, mode).unwrap()
}

#[test]
fn test_day_cell_single_row() {
    let dataset = single_row();
    let pivot = run(&dataset, SheetType::CellDay, None);

    assert_eq!(pivot.mode, AggregationMode::DayCell);
    assert_eq!(pivot.buckets, vec![Bucket::Day(day(2025, 1, 1))]);
    assert_eq!(pivot.rows.len(), 1);

    let row = &pivot.rows[0];
    assert_eq!(
        (row.element.as_str(), row.cell.as_str(), row.metric.as_str()),
        ("E1", "C1", "Average CQI")
    );
    assert_eq!(row.values, vec![Some(7.0)]);
    assert_eq!(pivot.buckets[0].to_string(), "2025-01-01");
}

#[test]
fn test_continue_single_date_buckets_by_hour() {
    let dataset = single_row();
    let pivot = run(&dataset, SheetType::Continue, None);

    assert_eq!(pivot.mode, AggregationMode::HourCellSingleDay);
    let bucket = Bucket::DayHour(day(2025, 1, 1), 10);
    assert_eq!(pivot.buckets, vec![bucket]);
    assert_eq!(pivot.value("E1", "C1", "Average CQI", &bucket), Some(7.0));
}

#[test]
fn test_continue_multi_date_keeps_only_selected_hour() {
    let raw = table(
        &["Period start time", "MRBTS name", "LNCEL name", "Average CQI"],
        &[
            &["2025-01-01 10:00:00", "E1", "C1", "7"],
            &["2025-01-01 11:00:00", "E1", "C1", "100"],
            &["2025-01-02 10:00:00", "E1", "C1", "8"],
            &["2025-01-02 09:00:00", "E1", "C2", "100"],
        ],
    );
    let dataset = ingest(raw, &ColumnNames::default()).unwrap();
    let pivot = run(&dataset, SheetType::Continue, Some(10));

    assert_eq!(pivot.mode, AggregationMode::HourCellFiltered { hour: 10 });
    assert_eq!(
        pivot.buckets,
        vec![Bucket::Day(day(2025, 1, 1)), Bucket::Day(day(2025, 1, 2))]
    );
    // C2 only reported at 09:00, so it is absent rather than zeroed
    assert_eq!(pivot.rows.len(), 1);
    assert_eq!(pivot.rows[0].values, vec![Some(7.0), Some(8.0)]);
}

#[test]
fn test_missing_cell_column_stops_pipeline() {
    let raw = table(
        &["Period start time", "MRBTS name", "Average CQI"],
        &[&["2025-01-01 10:00:00", "E1", "7"]],
    );
    assert_eq!(
        ingest(raw, &ColumnNames::default()),
        Err(IngestError::MissingMandatoryColumn("LNCEL name".to_string()))
    );

    let names = ColumnNames::default();
    let dataset = Dataset::new(
        vec![names.timestamp.clone(), names.element.clone()],
        names,
        vec![],
        vec![],
    );
    for mode in [
        AggregationMode::DayCell,
        AggregationMode::HourCellSingleDay,
        AggregationMode::HourCellFiltered { hour: 0 },
    ] {
        assert_eq!(
            aggregate(&dataset, mode),
            Err(AggregateError::InvalidStructure("LNCEL name".to_string()))
        );
    }
}

#[test]
fn test_not_available_values_are_skipped() {
    let raw = table(
        &["Period start time", "MRBTS name", "LNCEL name", "Average CQI"],
        &[
            &["2025-01-01 10:00:00", "E1", "C1", "7"],
            &["2025-01-01 11:00:00", "E1", "C1", "N/A"],
            &["2025-01-01 12:00:00", "E1", "C1", "3"],
            &["2025-01-01 12:00:00", "E1", "C2", "N/A"],
        ],
    );
    let dataset = ingest(raw, &ColumnNames::default()).unwrap();
    let pivot = run(&dataset, SheetType::CellDay, None);
    let bucket = Bucket::Day(day(2025, 1, 1));

    assert_eq!(pivot.value("E1", "C1", "Average CQI", &bucket), Some(10.0));
    // only N/A contributed: empty, not 0
    assert_eq!(pivot.value("E1", "C2", "Average CQI", &bucket), None);
    assert!(pivot.row("E1", "C2", "Average CQI").is_some());
}

#[test]
fn test_no_catalog_kpis_gives_empty_pivot() {
    let raw = table(
        &["Period start time", "MRBTS name", "LNCEL name", "Something else"],
        &[&["2025-01-01 10:00:00", "E1", "C1", "7"]],
    );
    let dataset = ingest(raw, &ColumnNames::default()).unwrap();
    assert!(dataset.metrics().is_empty());

    let pivot = run(&dataset, SheetType::CellDay, None);
    assert!(pivot.is_empty());
}

#[test]
fn test_fixture_kpi_report() {
    let dataset = load_dataset(FIXTURE, &ColumnNames::default()).unwrap();
    let report = KpiReport::from_dataset(&dataset);

    assert_eq!(
        report.eligible,
        vec![
            "Cell Avail excl BLU",
            "Average CQI",
            "Total LTE data volume, DL + UL",
            "Avg UE distance",
        ]
    );
    assert_eq!(report.eligible.len() + report.missing.len(), KPI_CATALOG.len());
    assert_eq!(report.rows, 8);
    assert_eq!(report.distinct_dates, 2);
    assert_eq!(report.unparsed_timestamps, 1);
}

#[test]
fn test_fixture_day_cell_pivot() {
    let pivot = pivot_file(FIXTURE, &ColumnNames::default(), SheetType::CellDay, None).unwrap();
    let d15 = Bucket::Day(day(2025, 1, 15));
    let d16 = Bucket::Day(day(2025, 1, 16));

    assert_eq!(pivot.buckets, vec![d15, d16]);
    assert_eq!(pivot.rows.len(), 3 * 4);
    assert!(pivot.buckets.iter().all(|b| b.hour().is_none()));

    assert_eq!(pivot.value("MRBTS-1001", "LNCEL-1001-1", "Average CQI", &d15), Some(19.5));
    assert_eq!(
        pivot.value("MRBTS-1001", "LNCEL-1001-1", "Total LTE data volume, DL + UL", &d15),
        Some(3100.5)
    );
    assert_eq!(pivot.value("MRBTS-1001", "LNCEL-1001-2", "Average CQI", &d15), None);
    assert_eq!(pivot.value("MRBTS-1001", "LNCEL-1001-2", "Average CQI", &d16), Some(8.0));

    // the unparseable row (CQI 50) never reaches a bucket
    assert_eq!(pivot.value("MRBTS-2002", "LNCEL-2002-1", "Average CQI", &d15), None);
    assert_eq!(pivot.value("MRBTS-2002", "LNCEL-2002-1", "Average CQI", &d16), Some(12.0));

    let first = &pivot.rows[0];
    assert_eq!(
        (first.element.as_str(), first.cell.as_str(), first.metric.as_str()),
        ("MRBTS-1001", "LNCEL-1001-1", "Cell Avail excl BLU")
    );
}

#[test]
fn test_fixture_continue_requires_hour() {
    let err = pivot_file(FIXTURE, &ColumnNames::default(), SheetType::Continue, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Aggregate(AggregateError::HourRequired { distinct_dates: 2 })
    ));
}

#[test]
fn test_fixture_continue_with_hour() {
    let pivot = pivot_file(
        FIXTURE,
        &ColumnNames::default(),
        SheetType::Continue,
        Some(10),
    )
    .unwrap();
    let d15 = Bucket::Day(day(2025, 1, 15));
    let d16 = Bucket::Day(day(2025, 1, 16));

    assert_eq!(pivot.mode.summary(), "Hour 10 KPI Generated");
    assert_eq!(pivot.value("MRBTS-1001", "LNCEL-1001-1", "Average CQI", &d15), Some(10.0));
    assert_eq!(pivot.value("MRBTS-1001", "LNCEL-1001-1", "Average CQI", &d16), Some(11.0));
    assert_eq!(
        pivot.value("MRBTS-1001", "LNCEL-1001-1", "Total LTE data volume, DL + UL", &d15),
        Some(1600.0)
    );
}

#[test]
fn test_aggregation_is_repeatable() {
    let dataset = load_dataset(FIXTURE, &ColumnNames::default()).unwrap();
    let mode = AggregationMode::HourCellSingleDay;
    assert_eq!(aggregate(&dataset, mode), aggregate(&dataset, mode));
}

#[test]
fn test_continue_single_date_sums_each_hour() {
    let raw = table(
        &["Period start time", "MRBTS name", "LNCEL name", "Average CQI"],
        &[
            &["2025-01-01 11:00:00", "E1", "C1", "N/A"],
            &["2025-01-01 10:00:00", "E1", "C1", "7"],
            &["garbage", "E1", "C1", "100"],
            &["2025-01-01 10:30:00", "E1", "C1", "3"],
        ],
    );
    let dataset = ingest(raw, &ColumnNames::default()).unwrap();
    let pivot = run(&dataset, SheetType::Continue, None);

    assert_eq!(pivot.mode, AggregationMode::HourCellSingleDay);
    assert_eq!(
        pivot.buckets.iter().map(Bucket::to_string).collect::<Vec<_>>(),
        vec!["2025-01-01 10:00", "2025-01-01 11:00"]
    );
    assert_eq!(pivot.rows.len(), 1);
    // 10:00 and 10:30 share a bucket; 11:00 only had N/A
    assert_eq!(pivot.rows[0].values, vec![Some(10.0), None]);
}

#[test]
fn test_xlsx_keeps_typed_cells() {
    let raw = read_table(XLSX_FIXTURE).unwrap();

    assert_eq!(raw.headers.len(), 8);
    assert_eq!(raw.headers[1], " MRBTS name ");
    assert_eq!(raw.rows.len(), 8);

    assert_eq!(raw.rows[0][0], RawValue::DateTime(at(15, 9)));
    assert_eq!(raw.rows[0][1], RawValue::Text("MRBTS-1001".into()));
    assert_eq!(raw.rows[0][3], RawValue::Number(100.0));
    assert_eq!(raw.rows[2][4], RawValue::Text("N/A".into()));
    assert_eq!(raw.rows[7][0], RawValue::Text("not a time".into()));
}

#[test]
fn test_xlsx_float_datetime_rounds_to_hour() {
    // stored as 09:59:59.999
    let raw = read_table(XLSX_FIXTURE).unwrap();
    match &raw.rows[1][0] {
        RawValue::DateTime(dt) => {
            assert_eq!(*dt, at(15, 10));
            assert_eq!(dt.hour(), 10);
        }
        other => panic!("expected a date-time cell, got {other:?}"),
    }
}

#[test]
fn test_xlsx_matches_csv_report() {
    let names = ColumnNames::default();
    let from_csv = load_dataset(FIXTURE, &names).unwrap();
    let from_xlsx = load_dataset(XLSX_FIXTURE, &names).unwrap();

    assert_eq!(from_xlsx.columns(), from_csv.columns());
    assert_eq!(
        KpiReport::from_dataset(&from_xlsx),
        KpiReport::from_dataset(&from_csv)
    );
}

#[test]
fn test_xlsx_matches_csv_pivots() {
    let names = ColumnNames::default();

    for (sheet, hour) in [
        (SheetType::CellDay, None),
        (SheetType::Continue, Some(10)),
        (SheetType::Continue, Some(9)),
    ] {
        let from_csv = pivot_file(FIXTURE, &names, sheet, hour).unwrap();
        let from_xlsx = pivot_file(XLSX_FIXTURE, &names, sheet, hour).unwrap();
        assert_eq!(from_xlsx, from_csv);
    }

    let hourly = pivot_file(XLSX_FIXTURE, &names, SheetType::Continue, Some(10)).unwrap();
    let d15 = Bucket::Day(day(2025, 1, 15));
    assert_eq!(hourly.value("MRBTS-1001", "LNCEL-1001-1", "Average CQI", &d15), Some(10.0));
}

#[test]
fn test_xlsx_empty_sheet_has_no_columns() {
    let raw = read_table(EMPTY_SHEET).unwrap();
    assert!(raw.headers.is_empty());
    assert!(raw.rows.is_empty());

    let err = load_dataset(EMPTY_SHEET, &ColumnNames::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Ingest(IngestError::MissingMandatoryColumn(_))
    ));
}

#[test]
fn test_workbook_without_sheets() {
    assert!(matches!(
        read_table(NO_SHEETS),
        Err(ReadError::EmptyWorkbook(_))
    ));
}
