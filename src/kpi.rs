//! Derives scalar summary statistics from the filtered record set and its
//! monthly aggregate.
//!
//! Statistics that cannot be computed from the available data are reported as
//! `None`, never defaulted to zero; "no spending" and "not enough data" are
//! distinct states.

use serde::Serialize;
use time::Date;

use crate::{aggregate::MonthBucket, record::ExpenseRecord};

/// The scalar summary statistics shown at the top of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSet {
    /// The sum of all filtered amounts. Zero when the filtered set is empty.
    pub total_spent: f64,
    /// The mean of the monthly sums, or `None` when no months are present.
    pub avg_per_month: Option<f64>,
    /// The largest single amount, or `None` when the filtered set is empty.
    pub max_expense: Option<f64>,
    /// The number of filtered records.
    pub transaction_count: usize,
    /// The calendar month immediately preceding the selected range start.
    pub prior_month: MonthBucket,
    /// The full dataset's spend in [KpiSet::prior_month], when that month has
    /// any records at all.
    pub prior_month_spend: Option<f64>,
    /// Percentage change of [KpiSet::avg_per_month] versus the prior month's
    /// spend. Only defined when the prior month exists in the full dataset
    /// with a strictly positive sum and the average itself is available.
    pub pct_change_vs_prior: Option<f64>,
}

/// The outcome of comparing total spend against a user-supplied budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BudgetStatus {
    /// Total spend exceeded the budget by `overage`.
    Over {
        /// The budget threshold.
        budget: f64,
        /// How far over the budget the total spend is.
        overage: f64,
    },
    /// Total spend is at or under the budget with `remaining` to spare.
    Within {
        /// The budget threshold.
        budget: f64,
        /// How much of the budget is left.
        remaining: f64,
    },
}

/// Computes the KPI set for a filtered record set.
///
/// `filtered_monthly` must be the monthly aggregate of `filtered`.
/// `full_monthly` is the monthly aggregate of the *unfiltered* dataset: the
/// month feeding the prior-month comparison typically falls outside the
/// selected window, so the comparison deliberately ignores the category and
/// payment-method filters. `range_start` is the start of the selected date
/// range, from which the prior month is derived.
pub fn compute_kpis(
    filtered: &[ExpenseRecord],
    filtered_monthly: &[(MonthBucket, f64)],
    full_monthly: &[(MonthBucket, f64)],
    range_start: Date,
) -> KpiSet {
    let total_spent: f64 = filtered.iter().map(|record| record.amount).sum();

    let avg_per_month = if filtered_monthly.is_empty() {
        None
    } else {
        let monthly_total: f64 = filtered_monthly.iter().map(|(_, sum)| sum).sum();
        Some(monthly_total / filtered_monthly.len() as f64)
    };

    let max_expense = filtered
        .iter()
        .map(|record| record.amount)
        .max_by(f64::total_cmp);

    let prior_month = MonthBucket::from_date(range_start).prev();
    let prior_month_spend = full_monthly
        .iter()
        .find(|(month, _)| *month == prior_month)
        .map(|(_, sum)| *sum);

    let pct_change_vs_prior = match (avg_per_month, prior_month_spend) {
        (Some(avg), Some(prior)) if prior > 0.0 => Some((avg - prior) / prior * 100.0),
        _ => None,
    };

    KpiSet {
        total_spent,
        avg_per_month,
        max_expense,
        transaction_count: filtered.len(),
        prior_month,
        prior_month_spend,
        pct_change_vs_prior,
    }
}

/// Classifies total spend against a budget threshold.
///
/// A zero or absent budget disables the classification entirely and yields
/// `None`; it does not mean "always within budget".
pub fn budget_status(total_spent: f64, budget: Option<f64>) -> Option<BudgetStatus> {
    let budget = budget?;

    if budget <= 0.0 {
        return None;
    }

    if total_spent > budget {
        Some(BudgetStatus::Over {
            budget,
            overage: total_spent - budget,
        })
    } else {
        Some(BudgetStatus::Within {
            budget,
            remaining: budget - total_spent,
        })
    }
}
