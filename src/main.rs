use analytics::{AnalyticsEngine, DashboardReport, DateRange, Headline};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{Settings, SettingsOverrides, init_tracing, load_config};
use core_types::OrderRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// The main entry point for the orderlens application.
fn main() {
    // Load ORDERLENS_* and RUST_LOG from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales dashboard figures for an e-commerce order dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./orderlens.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard tables for a date range.
    Summary(SelectionArgs),
    /// Write the dashboard tables for a date range as JSON.
    Export(ExportArgs),
}

#[derive(Parser)]
struct SelectionArgs {
    /// First day to include (format: YYYY-MM-DD). Defaults to the earliest order.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (format: YYYY-MM-DD). Defaults to the latest order.
    #[arg(long)]
    to: Option<NaiveDate>,

    #[command(flatten)]
    overrides: SettingsOverrides,
}

#[derive(Parser)]
struct ExportArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output file for the JSON report. Writes to stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

/// The JSON document written by `export`.
#[derive(Serialize)]
struct ExportDocument<'a> {
    headline: Headline,
    #[serde(flatten)]
    report: &'a DashboardReport,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Summary(args) => {
            let settings = args.overrides.apply(settings)?;
            let _guard = init_tracing(&settings.logging)?;
            let report = build_report(&args, &settings)?;
            print_summary(&report, settings.report.top_n);
        }
        Commands::Export(args) => {
            let settings = args.selection.overrides.apply(settings)?;
            let _guard = init_tracing(&settings.logging)?;
            let report = build_report(&args.selection, &settings)?;
            write_export(&report, args.output.as_deref())?;
        }
    }

    Ok(())
}

// ==============================================================================
// Report Building
// ==============================================================================

/// Loads the dataset, resolves the date range and runs the analytics.
fn build_report(args: &SelectionArgs, settings: &Settings) -> anyhow::Result<DashboardReport> {
    let records = load_records(&settings.dataset.path)?;
    let range = resolve_range(args.from, args.to, &records)?;

    tracing::info!(
        records = records.len(),
        from = ?range.map(|r| r.start()),
        to = ?range.map(|r| r.end()),
        "Building dashboard report."
    );

    let engine = AnalyticsEngine::new().with_daily_buckets(settings.report.daily_buckets);
    let report = engine.dashboard(&records, range)?;
    Ok(report)
}

/// Reads a JSON array of order records and sorts it chronologically.
fn load_records(path: &Path) -> anyhow::Result<Vec<OrderRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;
    let mut records: Vec<OrderRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to read order records from {}", path.display()))?;

    records.sort_by_key(|r| r.order_date);
    tracing::debug!(records = records.len(), path = %path.display(), "Loaded dataset.");
    Ok(records)
}

/// Fills missing bounds from the dataset's own first and last order day.
fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    records: &[OrderRecord],
) -> anyhow::Result<Option<DateRange>> {
    let covering = DateRange::covering(records);
    let start = from.or(covering.map(|r| r.start()));
    let end = to.or(covering.map(|r| r.end()));

    let range = match (start, end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        // Only reachable for an empty dataset with a single bound given.
        (Some(day), None) | (None, Some(day)) => Some(DateRange::new(day, day)?),
        (None, None) => None,
    };
    Ok(range)
}

// ==============================================================================
// Output
// ==============================================================================

fn write_export(report: &DashboardReport, output: Option<&Path>) -> anyhow::Result<()> {
    let document = ExportDocument {
        headline: report.headline(),
        report,
    };

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
            tracing::info!(path = %path.display(), "Report written.");
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &document)?;
            println!();
        }
    }
    Ok(())
}

fn print_summary(report: &DashboardReport, top_n: usize) {
    let headline = report.headline();
    match report.range {
        Some(range) => println!(
            "Orders from {} to {} ({} days)",
            range.start(),
            range.end(),
            range.num_days()
        ),
        None => println!("No orders in the dataset"),
    }
    println!("Total orders:  {}", headline.total_orders);
    println!("Total revenue: {}", headline.total_revenue);

    println!("\nDaily Orders");
    let mut daily = new_table(&["Date", "Orders", "Revenue"]);
    for row in &report.daily_orders {
        daily.add_row(vec![
            row.date.to_string(),
            row.order_count.to_string(),
            row.revenue.to_string(),
        ]);
    }
    println!("{daily}");

    println!("\nBest Performing Product");
    let mut best = new_table(&["Category", "Number of Sales"]);
    for row in report.best_performing(top_n) {
        best.add_row(vec![row.product_category_name.clone(), row.quantity.to_string()]);
    }
    println!("{best}");

    println!("\nWorst Performing Product");
    let mut worst = new_table(&["Category", "Number of Sales"]);
    for row in report.worst_performing(top_n) {
        worst.add_row(vec![row.product_category_name.clone(), row.quantity.to_string()]);
    }
    println!("{worst}");

    println!("\nNumber of Customer by Status");
    let mut status = new_table(&["Status", "Customers"]);
    for row in &report.status_counts {
        status.add_row(vec![row.status_group.to_string(), row.customer_count.to_string()]);
    }
    println!("{status}");

    println!("\nNumber of Customer by State");
    let mut states = new_table(&["State", "Customers"]);
    for row in report.states_by_customers() {
        states.add_row(vec![row.customer_state.clone(), row.customer_count.to_string()]);
    }
    println!("{states}");

    println!("\nBest Customer Based on RFM Parameters");
    println!("Average Recency (days): {}", display_or_dash(headline.average_recency));
    println!("Average Frequency:      {}", display_or_dash(headline.average_frequency));
    println!("Average Monetary:       {}", display_or_dash(headline.average_monetary));

    let mut rfm = new_table(&["Ranking", "Customer", "Recency", "Frequency", "Monetary"]);
    let rankings = [
        ("By Recency", report.top_by_recency(top_n)),
        ("By Frequency", report.top_by_frequency(top_n)),
        ("By Monetary", report.top_by_monetary(top_n)),
    ];
    for (label, rows) in rankings {
        for row in rows {
            rfm.add_row(vec![
                label.to_string(),
                row.customer_id.clone(),
                row.recency.to_string(),
                row.frequency.to_string(),
                row.monetary.to_string(),
            ]);
        }
    }
    println!("{rfm}");
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn display_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(day: u32) -> OrderRecord {
        OrderRecord {
            order_id: format!("o-{day}"),
            customer_id: "c-1".to_string(),
            order_date: NaiveDate::from_ymd_opt(2018, 6, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            order_delivered_customer_date: None,
            product_category_name: "toys".to_string(),
            quantity: 1,
            total_price: dec!(25),
            customer_state: "SP".to_string(),
            status_group: "Completed".to_string(),
        }
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 6, day).unwrap()
    }

    #[test]
    fn range_defaults_to_dataset_bounds() {
        let records = vec![record(3), record(9), record(5)];
        let range = resolve_range(None, None, &records).unwrap().unwrap();
        assert_eq!((range.start(), range.end()), (june(3), june(9)));

        let range = resolve_range(Some(june(4)), None, &records).unwrap().unwrap();
        assert_eq!((range.start(), range.end()), (june(4), june(9)));
    }

    #[test]
    fn reversed_bounds_fail() {
        let records = vec![record(3), record(9)];
        assert!(resolve_range(Some(june(8)), Some(june(2)), &records).is_err());
    }

    #[test]
    fn empty_dataset_without_bounds_has_no_range() {
        assert!(resolve_range(None, None, &[]).unwrap().is_none());
    }

    #[test]
    fn loads_and_sorts_json_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let records = vec![record(9), record(2)];
        std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, vec![record(2), record(9)]);
    }
}
