//! One-pass orchestration of the analytics pipeline.
//!
//! Every user interaction (upload, filter change, manual entry) maps to one
//! call of [analyze] over the session's current record set: a fresh pure
//! transform with no cached or mutated state. The report carries everything
//! a presentation layer consumes.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{
    aggregate::{MonthBucket, aggregate_by_category, aggregate_by_month, cumulative},
    filter::{FilterCriteria, filter},
    forecast::{ForecastPoint, forecast},
    insight::insights,
    kpi::{BudgetStatus, KpiSet, budget_status, compute_kpis},
    record::ExpenseRecord,
};

/// Engine knobs that are not filter selections.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Budget threshold for the over/within classification; `None` or a
    /// non-positive value disables it.
    pub budget: Option<f64>,
    /// How many calendar months to forecast past the last observed month.
    pub forecast_horizon: usize,
    /// Whether the forecaster adds a yearly seasonal component.
    pub yearly_seasonality: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            budget: None,
            forecast_horizon: 3,
            yearly_seasonality: false,
        }
    }
}

/// Everything the presentation layer needs to render one view of the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Scalar summary statistics for the filtered set.
    pub kpis: KpiSet,
    /// Budget classification, when a budget was configured.
    pub budget_status: Option<BudgetStatus>,
    /// Chart-ready monthly sums, chronological.
    pub monthly_totals: Vec<(MonthBucket, f64)>,
    /// Chart-ready category sums, largest first (ties alphabetical).
    pub category_totals: Vec<(String, f64)>,
    /// Running cumulative spend over time.
    pub cumulative: Vec<(Date, f64)>,
    /// Forecast series, or `None` when the history is too short or
    /// degenerate.
    pub forecast: Option<Vec<ForecastPoint>>,
    /// Advisory strings in fixed display order.
    pub insights: Vec<String>,
    /// The filtered records themselves, for table display and export.
    pub filtered: Vec<ExpenseRecord>,
}

/// Runs the full pipeline over one record set: filter, aggregate, KPIs,
/// budget, forecast, insights.
///
/// Pure function of its inputs; session state is whatever record set the
/// caller passes in.
pub fn analyze(
    records: &[ExpenseRecord],
    criteria: &FilterCriteria,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let filtered = filter(records, criteria);
    tracing::debug!(
        "{} of {} records passed the filters",
        filtered.len(),
        records.len()
    );

    let monthly_totals = aggregate_by_month(&filtered);
    let full_monthly = aggregate_by_month(records);
    let category_map = aggregate_by_category(&filtered);
    let cumulative = cumulative(&filtered);

    let kpis = compute_kpis(
        &filtered,
        &monthly_totals,
        &full_monthly,
        criteria.date_start(),
    );
    let budget_status = budget_status(kpis.total_spent, config.budget);
    let forecast = forecast(
        &monthly_totals,
        config.forecast_horizon,
        config.yearly_seasonality,
    );
    let insights = insights(&kpis, &category_map);

    AnalysisReport {
        budget_status,
        monthly_totals,
        category_totals: sorted_category_totals(category_map),
        cumulative,
        forecast,
        insights,
        kpis,
        filtered,
    }
}

fn sorted_category_totals(category_map: HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut totals: Vec<_> = category_map.into_iter().collect();
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}
