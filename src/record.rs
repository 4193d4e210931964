//! Defines the canonical expense record and per-row validation.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

/// The date format used on the wire, e.g. "2024-01-05".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A single validated expense, i.e. an event where money was spent.
///
/// An `ExpenseRecord` is only ever produced by [ExpenseRecord::parse], so a
/// record in hand is guaranteed to have a real calendar date and a finite
/// numeric amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// When the expense happened, at day resolution.
    pub date: Date,
    /// The spending category, carried verbatim from the input (may be empty).
    pub category: String,
    /// The amount of money spent. Signed; refunds may appear as negatives.
    pub amount: f64,
    /// How the expense was paid, carried verbatim from the input.
    pub payment_method: String,
    /// A free-text description of what the expense was for.
    pub description: String,
}

impl ExpenseRecord {
    /// Validates a raw row and normalises it into an [ExpenseRecord].
    ///
    /// Returns `None` when the date does not parse as `YYYY-MM-DD` or the
    /// amount does not parse as a finite number. The row is rejected, never
    /// coerced to a default date or a zero amount.
    pub fn parse(
        date: &str,
        category: &str,
        amount: &str,
        payment_method: &str,
        description: &str,
    ) -> Option<ExpenseRecord> {
        let date = Date::parse(date.trim(), &DATE_FORMAT).ok()?;
        let amount: f64 = amount.trim().parse().ok()?;

        if !amount.is_finite() {
            return None;
        }

        Some(ExpenseRecord {
            date,
            category: category.to_owned(),
            amount,
            payment_method: payment_method.to_owned(),
            description: description.to_owned(),
        })
    }
}
