//! Spendsight is an expense analytics and forecasting engine.
//!
//! It ingests dated expense records from CSV, applies the user's filter
//! selections, and produces descriptive analytics (totals, category
//! breakdowns, month-over-month trends), a short-horizon forecast with
//! confidence bounds, and a small set of rule-based textual insights.
//!
//! The engine is a pure function over immutable inputs: every filter change
//! or upload is one full recomputation via [analyze], with no cached or
//! shared state. Presentation (charts, widgets, layout) lives entirely with
//! the caller.

#![warn(missing_docs)]

mod aggregate;
mod csv;
mod error;
mod filter;
mod forecast;
mod format;
mod insight;
mod kpi;
mod record;
mod report;

pub use crate::{
    aggregate::{MonthBucket, aggregate_by_category, aggregate_by_month, cumulative},
    csv::{CsvImport, REQUIRED_COLUMNS, parse_expenses_csv, write_expenses_csv},
    error::Error,
    filter::{FilterCriteria, filter},
    forecast::{ForecastPoint, forecast},
    format::{format_currency, format_pct_change},
    insight::insights,
    kpi::{BudgetStatus, KpiSet, budget_status, compute_kpis},
    record::{DATE_FORMAT, ExpenseRecord},
    report::{AnalysisConfig, AnalysisReport, analyze},
};
