//! Applies date-range, category, payment-method, and text-search predicates
//! to a set of expense records.

use std::collections::HashSet;

use serde::Serialize;
use time::Date;

use crate::{Error, record::ExpenseRecord};

/// The filter selections supplied by the presentation layer.
///
/// A record passes when its date falls inside the inclusive range, its
/// category and payment method are in the allowed sets, and (when a search
/// string is set) its description contains the search text, case-insensitive.
///
/// An empty `categories` or `payment_methods` set is honoured literally: no
/// record passes. Callers that want "everything" must pass every value
/// present in the dataset, the way a multiselect widget defaults to all
/// options selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    date_start: Date,
    date_end: Date,
    categories: HashSet<String>,
    payment_methods: HashSet<String>,
    search_text: Option<String>,
}

impl FilterCriteria {
    /// Creates filter criteria, validating the date range.
    ///
    /// Returns [Error::InvalidDateRange] when `date_start` is after
    /// `date_end`.
    pub fn new(
        date_start: Date,
        date_end: Date,
        categories: HashSet<String>,
        payment_methods: HashSet<String>,
        search_text: Option<String>,
    ) -> Result<FilterCriteria, Error> {
        if date_start > date_end {
            return Err(Error::InvalidDateRange {
                start: date_start,
                end: date_end,
            });
        }

        Ok(FilterCriteria {
            date_start,
            date_end,
            categories,
            payment_methods,
            search_text,
        })
    }

    /// The inclusive start of the selected date range.
    pub fn date_start(&self) -> Date {
        self.date_start
    }

    /// The inclusive end of the selected date range.
    pub fn date_end(&self) -> Date {
        self.date_end
    }

    fn matches(&self, record: &ExpenseRecord) -> bool {
        if record.date < self.date_start || record.date > self.date_end {
            return false;
        }

        if !self.categories.contains(&record.category) {
            return false;
        }

        if !self.payment_methods.contains(&record.payment_method) {
            return false;
        }

        match &self.search_text {
            Some(search) if !search.trim().is_empty() => record
                .description
                .to_lowercase()
                .contains(&search.trim().to_lowercase()),
            _ => true,
        }
    }
}

/// Returns the records that pass every predicate in `criteria`.
///
/// Input order is preserved. An empty result is a valid terminal state, not
/// an error; downstream stages report their statistics as unavailable.
pub fn filter(records: &[ExpenseRecord], criteria: &FilterCriteria) -> Vec<ExpenseRecord> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}
