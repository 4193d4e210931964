//! The command-line front end for the expense analytics engine.

use std::{collections::HashSet, fs, path::PathBuf, process};

use clap::Parser;
use time::Date;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use spendsight::{
    AnalysisConfig, AnalysisReport, BudgetStatus, DATE_FORMAT, ExpenseRecord, FilterCriteria,
    analyze, format_currency, format_pct_change, parse_expenses_csv, write_expenses_csv,
};

/// Analyses an expense CSV and prints KPIs, trends, a forecast, and insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the expenses CSV (Date,Category,Amount,Payment Method,Description).
    csv_path: PathBuf,

    /// Start of the date range (YYYY-MM-DD). Defaults to the earliest record.
    #[arg(long, value_parser = parse_cli_date)]
    from: Option<Date>,

    /// End of the date range (YYYY-MM-DD). Defaults to the latest record.
    #[arg(long, value_parser = parse_cli_date)]
    to: Option<Date>,

    /// Only include this category; repeatable. Defaults to every category present.
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Only include this payment method; repeatable. Defaults to every method present.
    #[arg(long = "payment-method")]
    payment_methods: Vec<String>,

    /// Case-insensitive text to search for in descriptions.
    #[arg(long)]
    search: Option<String>,

    /// Monthly budget for the over/within classification. Omit to disable.
    #[arg(long)]
    budget: Option<f64>,

    /// How many months to forecast past the last observed month.
    #[arg(long, default_value_t = 3)]
    horizon: usize,

    /// Add a yearly seasonal component to the forecast.
    #[arg(long)]
    seasonality: bool,

    /// Print the full report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Write the filtered records to this path as CSV.
    #[arg(long)]
    export: Option<PathBuf>,
}

fn parse_cli_date(text: &str) -> Result<Date, String> {
    Date::parse(text.trim(), &DATE_FORMAT)
        .map_err(|error| format!("'{text}' is not a YYYY-MM-DD date: {error}"))
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let text = fs::read_to_string(&args.csv_path).expect("Could not read the CSV file");

    let import = match parse_expenses_csv(&text) {
        Ok(import) => import,
        Err(error) => {
            tracing::error!("Could not ingest {}: {error}", args.csv_path.display());
            process::exit(1);
        }
    };

    if import.rows_dropped > 0 {
        tracing::warn!(
            "Dropped {} rows with unparseable dates or amounts",
            import.rows_dropped
        );
    }

    if import.records.is_empty() {
        tracing::error!(
            "No valid expense records found in {}",
            args.csv_path.display()
        );
        process::exit(1);
    }

    let criteria = match build_criteria(&args, &import.records) {
        Ok(criteria) => criteria,
        Err(error) => {
            tracing::error!("{error}");
            process::exit(1);
        }
    };

    let config = AnalysisConfig {
        budget: args.budget,
        forecast_horizon: args.horizon,
        yearly_seasonality: args.seasonality,
    };

    let report = analyze(&import.records, &criteria, &config);

    if let Some(path) = &args.export {
        let csv =
            write_expenses_csv(&report.filtered).expect("Could not serialise filtered records");
        fs::write(path, csv).expect("Could not write the export file");
        tracing::info!(
            "Wrote {} filtered records to {}",
            report.filtered.len(),
            path.display()
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report).expect("Could not serialise the report");
        println!("{json}");
    } else {
        print_report(&report);
    }
}

/// Fills unset filter selections from the dataset, the way a filter sidebar
/// defaults its date pickers to the data's span and its multiselects to
/// every value present.
fn build_criteria(
    args: &Args,
    records: &[ExpenseRecord],
) -> Result<FilterCriteria, spendsight::Error> {
    let earliest = records
        .iter()
        .map(|record| record.date)
        .min()
        .expect("records are non-empty");
    let latest = records
        .iter()
        .map(|record| record.date)
        .max()
        .expect("records are non-empty");

    let categories: HashSet<String> = if args.categories.is_empty() {
        records.iter().map(|record| record.category.clone()).collect()
    } else {
        args.categories.iter().cloned().collect()
    };

    let payment_methods: HashSet<String> = if args.payment_methods.is_empty() {
        records
            .iter()
            .map(|record| record.payment_method.clone())
            .collect()
    } else {
        args.payment_methods.iter().cloned().collect()
    };

    FilterCriteria::new(
        args.from.unwrap_or(earliest),
        args.to.unwrap_or(latest),
        categories,
        payment_methods,
        args.search.clone(),
    )
}

fn print_report(report: &AnalysisReport) {
    println!("== Key figures ==");
    println!("Total spending:    {}", format_currency(report.kpis.total_spent));

    match (report.kpis.avg_per_month, report.kpis.pct_change_vs_prior) {
        (Some(avg), Some(pct)) => println!(
            "Avg spend / month: {} ({} vs previous month)",
            format_currency(avg),
            format_pct_change(pct)
        ),
        (Some(avg), None) => println!("Avg spend / month: {}", format_currency(avg)),
        _ => println!("Avg spend / month: not available"),
    }

    match report.kpis.max_expense {
        Some(max) => println!("Highest expense:   {}", format_currency(max)),
        None => println!("Highest expense:   not available"),
    }

    println!("Transactions:      {}", report.kpis.transaction_count);

    match report.budget_status {
        Some(BudgetStatus::Over { budget, overage }) => println!(
            "Over the {} budget by {}!",
            format_currency(budget),
            format_currency(overage)
        ),
        Some(BudgetStatus::Within { budget, remaining }) => println!(
            "Within the {} budget with {} to spare.",
            format_currency(budget),
            format_currency(remaining)
        ),
        None => {}
    }

    if !report.monthly_totals.is_empty() {
        println!("\n== Monthly spending ==");
        for (month, sum) in &report.monthly_totals {
            println!("{month}  {}", format_currency(*sum));
        }
    }

    if !report.category_totals.is_empty() {
        println!("\n== Spending by category ==");
        for (category, sum) in &report.category_totals {
            println!("{category}: {}", format_currency(*sum));
        }
    }

    println!("\n== Forecast ==");
    match &report.forecast {
        Some(points) => {
            for point in points {
                println!(
                    "{}  {} (between {} and {})",
                    point.period,
                    format_currency(point.point_estimate),
                    format_currency(point.lower_bound),
                    format_currency(point.upper_bound)
                );
            }
        }
        None => println!("Not enough history to forecast."),
    }

    println!("\n== Insights ==");
    for insight in &report.insights {
        println!("- {insight}");
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().pretty().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .init();
}
