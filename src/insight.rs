//! A small rule table mapping KPI and aggregate conditions to human-readable
//! advisory strings.
//!
//! Rules are stateless and independent; they are evaluated over the same
//! inputs and emitted in a fixed display order so reports are deterministic.

use std::collections::HashMap;

use crate::kpi::KpiSet;

/// Month-over-month change beyond which spending counts as a sharp move.
const SHARP_CHANGE_PCT: f64 = 20.0;

/// Average monthly spend below this is the low tier.
const LOW_TIER_CEILING: f64 = 500.0;

/// Average monthly spend at or above this is the high tier.
const HIGH_TIER_FLOOR: f64 = 2000.0;

/// Canned saving tips per category; unrecognised categories fall back to
/// [GENERIC_TIP].
const CATEGORY_TIPS: [(&str, &str); 7] = [
    (
        "Food",
        "Meal planning and cooking at home can trim a surprising amount off a food bill.",
    ),
    (
        "Transport",
        "Check whether a monthly pass or carpooling works out cheaper than paying per trip.",
    ),
    (
        "Shopping",
        "Try a 48-hour waiting rule before non-essential purchases.",
    ),
    (
        "Entertainment",
        "Shared subscriptions and free events can cover a lot of the same ground.",
    ),
    (
        "Bills",
        "Review recurring bills once a quarter; providers often have cheaper plans.",
    ),
    (
        "Rent",
        "Housing dominates most budgets; compare options when the lease comes up for renewal.",
    ),
    (
        "Health",
        "Check whether insurance or generic alternatives cover part of these costs.",
    ),
];

const GENERIC_TIP: &str =
    "Look through its largest purchases for one-offs you could avoid next month.";

/// Evaluates every rule over the KPI set and category totals.
///
/// # Returns
/// Zero or more advisory strings in fixed display order: the
/// month-over-month trend note, then the top-category tip, then the
/// spending-tier note.
pub fn insights(kpis: &KpiSet, category_totals: &HashMap<String, f64>) -> Vec<String> {
    let mut messages = Vec::new();

    messages.push(trend_note(kpis));

    if let Some(tip) = top_category_tip(category_totals) {
        messages.push(tip);
    }

    if let Some(note) = spending_tier_note(kpis) {
        messages.push(note);
    }

    messages
}

fn trend_note(kpis: &KpiSet) -> String {
    match kpis.pct_change_vs_prior {
        Some(pct) if pct > SHARP_CHANGE_PCT => {
            "Alert: average monthly spending increased by more than 20% compared to the previous \
             month."
                .to_owned()
        }
        Some(pct) if pct < -SHARP_CHANGE_PCT => {
            "Good job! Average monthly spending decreased significantly compared to the previous \
             month."
                .to_owned()
        }
        Some(_) => "Spending is stable compared to the previous month.".to_owned(),
        None => "Not enough data for a month-over-month comparison.".to_owned(),
    }
}

fn top_category_tip(category_totals: &HashMap<String, f64>) -> Option<String> {
    // Ties broken alphabetically so the emitted tip is deterministic.
    let (category, _) = category_totals
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))?;

    let tip = CATEGORY_TIPS
        .iter()
        .find(|(name, _)| name == category)
        .map(|(_, tip)| *tip)
        .unwrap_or(GENERIC_TIP);

    Some(format!("Your biggest spending category is {category}. {tip}"))
}

fn spending_tier_note(kpis: &KpiSet) -> Option<String> {
    let avg = kpis.avg_per_month?;

    let note = if avg < LOW_TIER_CEILING {
        "Average monthly spending is in the low range. Nice work keeping costs down!"
    } else if avg < HIGH_TIER_FLOOR {
        "Average monthly spending is moderate. Worth keeping an eye on the bigger categories."
    } else {
        "Warning: average monthly spending is high. Consider setting a budget for your top \
         categories."
    };

    Some(note.to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::{aggregate::MonthBucket, insight::insights, kpi::KpiSet};

    fn kpis_with(avg_per_month: Option<f64>, pct_change_vs_prior: Option<f64>) -> KpiSet {
        KpiSet {
            total_spent: 100.0,
            avg_per_month,
            max_expense: Some(50.0),
            transaction_count: 3,
            prior_month: MonthBucket {
                year: 2023,
                month: 12,
            },
            prior_month_spend: None,
            pct_change_vs_prior,
        }
    }

    fn totals(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries
            .iter()
            .map(|(name, sum)| ((*name).to_owned(), *sum))
            .collect()
    }

    #[test]
    fn sharp_increase_emits_alert() {
        let messages = insights(&kpis_with(Some(100.0), Some(25.0)), &totals(&[]));

        assert!(messages[0].starts_with("Alert:"));
    }

    #[test]
    fn sharp_decrease_emits_praise() {
        let messages = insights(&kpis_with(Some(100.0), Some(-30.0)), &totals(&[]));

        assert!(messages[0].starts_with("Good job!"));
    }

    #[test]
    fn small_change_emits_stable_note() {
        let messages = insights(&kpis_with(Some(100.0), Some(5.0)), &totals(&[]));

        assert_eq!(
            messages[0],
            "Spending is stable compared to the previous month."
        );
    }

    #[test]
    fn missing_comparison_emits_insufficient_history() {
        let messages = insights(&kpis_with(Some(100.0), None), &totals(&[]));

        assert_eq!(
            messages[0],
            "Not enough data for a month-over-month comparison."
        );
    }

    #[test]
    fn top_category_gets_its_canned_tip() {
        let messages = insights(
            &kpis_with(Some(100.0), None),
            &totals(&[("Food", 80.0), ("Transport", 20.0)]),
        );

        assert!(messages[1].contains("Food"));
        assert!(messages[1].contains("Meal planning"));
    }

    #[test]
    fn unrecognised_category_falls_back_to_generic_tip() {
        let messages = insights(
            &kpis_with(Some(100.0), None),
            &totals(&[("Pet Llamas", 80.0)]),
        );

        assert!(messages[1].contains("Pet Llamas"));
        assert!(messages[1].contains("one-offs you could avoid"));
    }

    #[test]
    fn category_ties_break_alphabetically() {
        let messages = insights(
            &kpis_with(Some(100.0), None),
            &totals(&[("Transport", 50.0), ("Food", 50.0)]),
        );

        assert!(messages[1].contains("Food"));
    }

    #[test]
    fn empty_aggregate_emits_no_category_tip() {
        let messages = insights(&kpis_with(None, None), &totals(&[]));

        // Only the "not enough data" trend note; no tip, and no tier note
        // because the average is unavailable.
        assert_eq!(
            messages,
            vec!["Not enough data for a month-over-month comparison.".to_owned()]
        );
    }

    #[test]
    fn spending_tiers_choose_tone_by_threshold() {
        let low = insights(&kpis_with(Some(499.0), Some(0.0)), &totals(&[]));
        let medium = insights(&kpis_with(Some(500.0), Some(0.0)), &totals(&[]));
        let high = insights(&kpis_with(Some(2000.0), Some(0.0)), &totals(&[]));

        assert!(low[1].contains("low range"));
        assert!(medium[1].contains("moderate"));
        assert!(high[1].starts_with("Warning:"));
    }

    #[test]
    fn insights_keep_fixed_display_order() {
        let messages = insights(
            &kpis_with(Some(100.0), Some(0.0)),
            &totals(&[("Food", 100.0)]),
        );

        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("stable"));
        assert!(messages[1].contains("Food"));
        assert!(messages[2].contains("low range"));
    }
}
