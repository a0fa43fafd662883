//! CLI entry point for the LTE KPI pivot tool.
//!
//! Provides subcommands for pivoting a KPI export by day or hour at cell
//! level, and for checking which catalog KPIs an export contains.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lte_kpi_pivot::aggregator::{SheetType, aggregate, resolve_mode};
use lte_kpi_pivot::ingest::{ColumnNames, KpiReport};
use lte_kpi_pivot::{load_dataset, output};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "lte_kpi_pivot")]
#[command(about = "Day and hour level LTE KPI aggregation per cell", long_about = None)]
struct Cli {
    #[command(flatten)]
    columns: ColumnArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ColumnArgs {
    /// Name of the timestamp column
    #[arg(
        long,
        global = true,
        env = "LTE_TIMESTAMP_COLUMN",
        default_value = "Period start time"
    )]
    timestamp_column: String,

    /// Name of the cell identifier column
    #[arg(long, global = true, env = "LTE_CELL_COLUMN", default_value = "LNCEL name")]
    cell_column: String,

    /// Name of the network element identifier column
    #[arg(long, global = true, env = "LTE_ELEMENT_COLUMN", default_value = "MRBTS name")]
    element_column: String,
}

impl From<ColumnArgs> for ColumnNames {
    fn from(args: ColumnArgs) -> Self {
        ColumnNames {
            timestamp: args.timestamp_column,
            cell: args.cell_column,
            element: args.element_column,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Pivot a KPI export by cell and day or hour
    Pivot {
        /// Path to the .xlsx/.xls/.ods/.csv/.csv.gz export
        #[arg(value_name = "FILE")]
        file: String,

        /// "BBH (Cell Day)" / bbh, or "Continue (Hour / Day)" / continue
        #[arg(short, long, default_value = "bbh")]
        sheet_type: SheetType,

        /// Hour (0-23) to keep when a continue sheet spans several dates
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=23))]
        hour: Option<u8>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write CSV or JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report which catalog KPIs an export contains
    Kpis {
        /// Path to the .xlsx/.xls/.ods/.csv/.csv.gz export
        #[arg(value_name = "FILE")]
        file: String,

        /// Print the report as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Colored stderr plus a daily-rolling JSON log file.
///
/// The returned guard flushes the file writer on drop and must outlive `main`'s work.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/lte_kpi_pivot.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("lte_kpi_pivot.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let _file_guard = init_logging()?;

    let cli = Cli::parse();
    let names = ColumnNames::from(cli.columns);

    match cli.command {
        Commands::Pivot {
            file,
            sheet_type,
            hour,
            format,
            output,
        } => {
            pivot(&file, &names, sheet_type, hour, format, output.as_deref())
                .with_context(|| format!("Failed to build KPI pivot from '{file}'"))?;
        }
        Commands::Kpis { file, json } => {
            let dataset = load_dataset(&file, &names)
                .with_context(|| format!("Failed to read '{file}'"))?;
            let report = KpiReport::from_dataset(&dataset);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for kpi in &report.eligible {
                    info!(kpi = %kpi, status = "present", "KPI");
                }
                for kpi in &report.missing {
                    warn!(kpi = %kpi, status = "missing", "KPI");
                }
            }

            info!(
                eligible = report.eligible.len(),
                missing = report.missing.len(),
                rows = report.rows,
                distinct_dates = report.distinct_dates,
                unparsed_timestamps = report.unparsed_timestamps,
                "KPI validation summary"
            );
        }
    }

    Ok(())
}

/// Runs the full pipeline for one file and renders the result.
#[tracing::instrument(skip(names, sheet, format, out_path), fields(sheet = %sheet))]
fn pivot(
    file: &str,
    names: &ColumnNames,
    sheet: SheetType,
    hour: Option<u8>,
    format: OutputFormat,
    out_path: Option<&str>,
) -> Result<()> {
    let dataset = load_dataset(file, names)?;
    if dataset.metrics().is_empty() {
        warn!("No catalog KPI columns found; the pivot will have no rows");
    }

    let mode = resolve_mode(sheet, &dataset, hour)?;
    let table = aggregate(&dataset, mode)?;

    match (format, out_path) {
        (OutputFormat::Table, _) => {
            if out_path.is_some() {
                warn!("--output is ignored for table format");
            }
            print!("{}", output::render_table(&table, names));
        }
        (OutputFormat::Csv, Some(path)) => output::save_csv(path, &table, names)?,
        (OutputFormat::Csv, None) => output::write_csv(std::io::stdout().lock(), &table, names)?,
        (OutputFormat::Json, Some(path)) => std::fs::write(path, output::to_json(&table)?)?,
        (OutputFormat::Json, None) => println!("{}", output::to_json(&table)?),
    }

    Ok(())
}
