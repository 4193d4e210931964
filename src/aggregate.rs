//! Groups expense records into calendar-month buckets and computes sums.
//!
//! Provides the monthly series that drives the month-over-month KPIs and the
//! forecaster, the per-category totals, and the running cumulative series.

use std::{collections::HashMap, fmt};

use serde::Serialize;
use time::Date;

use crate::record::ExpenseRecord;

/// A canonical (year, month) key used to group expenses.
///
/// Ordering is chronological. Displays and serialises as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1 through 12.
    pub month: u8,
}

impl MonthBucket {
    /// The bucket containing the given date.
    pub fn from_date(date: Date) -> Self {
        MonthBucket {
            year: date.year(),
            month: date.month() as u8,
        }
    }

    /// The calendar month immediately after this one.
    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthBucket {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthBucket {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The calendar month immediately before this one.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            MonthBucket {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthBucket {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The signed number of calendar months from `origin` to `self`.
    ///
    /// Adjacent months differ by 1 regardless of year boundaries, which lets
    /// the forecaster fit a trend against true calendar spacing even when the
    /// observed series has gaps.
    pub fn months_since(self, origin: MonthBucket) -> i64 {
        (self.year as i64 - origin.year as i64) * 12 + (self.month as i64 - origin.month as i64)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sums expense amounts by calendar month.
///
/// # Returns
/// Chronologically ordered (month, sum) pairs covering exactly the months
/// that have at least one record. Months with no records are absent, not
/// zero-filled; this series is the ground truth for month-over-month
/// comparison. An empty input yields an empty vector.
pub fn aggregate_by_month(records: &[ExpenseRecord]) -> Vec<(MonthBucket, f64)> {
    let mut totals: HashMap<MonthBucket, f64> = HashMap::new();

    for record in records {
        *totals.entry(MonthBucket::from_date(record.date)).or_insert(0.0) += record.amount;
    }

    let mut series: Vec<_> = totals.into_iter().collect();
    series.sort_by_key(|(month, _)| *month);
    series
}

/// Sums expense amounts by category.
///
/// # Returns
/// One entry per distinct category present in `records`; categories absent
/// from the input do not appear. An empty input yields an empty map.
pub fn aggregate_by_category(records: &[ExpenseRecord]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for record in records {
        *totals.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }

    totals
}

/// Computes the running cumulative spend over time.
///
/// Records are stably sorted by date ascending (ties keep input order) and
/// prefix-summed.
///
/// # Returns
/// One (date, running sum) pair per record. An empty input yields an empty
/// vector.
pub fn cumulative(records: &[ExpenseRecord]) -> Vec<(Date, f64)> {
    let mut sorted: Vec<&ExpenseRecord> = records.iter().collect();
    // sort_by_key is stable, preserving input order within a date.
    sorted.sort_by_key(|record| record.date);

    let mut running = 0.0;
    sorted
        .into_iter()
        .map(|record| {
            running += record.amount;
            (record.date, running)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        aggregate::{MonthBucket, aggregate_by_category, aggregate_by_month, cumulative},
        record::ExpenseRecord,
    };

    fn create_test_record(date: time::Date, category: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord {
            date,
            category: category.to_owned(),
            amount,
            payment_method: "Card".to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn month_bucket_orders_chronologically() {
        let earlier = MonthBucket {
            year: 2023,
            month: 12,
        };
        let later = MonthBucket {
            year: 2024,
            month: 1,
        };

        assert!(earlier < later);
        assert_eq!(earlier.next(), later);
        assert_eq!(later.prev(), earlier);
    }

    #[test]
    fn month_bucket_months_since_spans_years() {
        let origin = MonthBucket {
            year: 2023,
            month: 11,
        };
        let target = MonthBucket {
            year: 2024,
            month: 2,
        };

        assert_eq!(target.months_since(origin), 3);
        assert_eq!(origin.months_since(target), -3);
        assert_eq!(origin.months_since(origin), 0);
    }

    #[test]
    fn month_bucket_displays_as_year_month() {
        let bucket = MonthBucket {
            year: 2024,
            month: 3,
        };
        assert_eq!(bucket.to_string(), "2024-03");
    }

    #[test]
    fn aggregate_by_month_sums_records_in_order() {
        let records = vec![
            create_test_record(date!(2024 - 02 - 10), "Transport", 20.0),
            create_test_record(date!(2024 - 01 - 05), "Food", 50.0),
            create_test_record(date!(2024 - 01 - 20), "Food", 30.0),
        ];

        let result = aggregate_by_month(&records);

        assert_eq!(
            result,
            vec![
                (
                    MonthBucket {
                        year: 2024,
                        month: 1
                    },
                    80.0
                ),
                (
                    MonthBucket {
                        year: 2024,
                        month: 2
                    },
                    20.0
                ),
            ]
        );
    }

    #[test]
    fn aggregate_by_month_skips_empty_months() {
        let records = vec![
            create_test_record(date!(2024 - 01 - 05), "Food", 50.0),
            create_test_record(date!(2024 - 04 - 05), "Food", 10.0),
        ];

        let result = aggregate_by_month(&records);

        // February and March have no records and must not appear.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].0.month, 1);
        assert_eq!(result[1].0.month, 4);
    }

    #[test]
    fn aggregate_by_month_handles_empty_input() {
        assert!(aggregate_by_month(&[]).is_empty());
    }

    #[test]
    fn aggregate_by_category_sums_per_category() {
        let records = vec![
            create_test_record(date!(2024 - 01 - 05), "Food", 50.0),
            create_test_record(date!(2024 - 01 - 20), "Food", 30.0),
            create_test_record(date!(2024 - 02 - 10), "Transport", 20.0),
        ];

        let result = aggregate_by_category(&records);

        assert_eq!(result.len(), 2);
        assert_eq!(result["Food"], 80.0);
        assert_eq!(result["Transport"], 20.0);
    }

    #[test]
    fn aggregate_by_category_handles_empty_input() {
        assert!(aggregate_by_category(&[]).is_empty());
    }

    #[test]
    fn cumulative_sorts_by_date_and_prefix_sums() {
        let records = vec![
            create_test_record(date!(2024 - 01 - 20), "Food", 30.0),
            create_test_record(date!(2024 - 01 - 05), "Food", 50.0),
            create_test_record(date!(2024 - 02 - 10), "Transport", 20.0),
        ];

        let result = cumulative(&records);

        assert_eq!(
            result,
            vec![
                (date!(2024 - 01 - 05), 50.0),
                (date!(2024 - 01 - 20), 80.0),
                (date!(2024 - 02 - 10), 100.0),
            ]
        );
    }

    #[test]
    fn cumulative_breaks_date_ties_by_input_order() {
        let records = vec![
            create_test_record(date!(2024 - 01 - 05), "First", 10.0),
            create_test_record(date!(2024 - 01 - 05), "Second", 5.0),
        ];

        let result = cumulative(&records);

        assert_eq!(result[0], (date!(2024 - 01 - 05), 10.0));
        assert_eq!(result[1], (date!(2024 - 01 - 05), 15.0));
    }

    #[test]
    fn cumulative_is_monotone_for_non_negative_amounts() {
        let records = vec![
            create_test_record(date!(2024 - 03 - 01), "Food", 5.0),
            create_test_record(date!(2024 - 01 - 01), "Food", 0.0),
            create_test_record(date!(2024 - 02 - 01), "Food", 7.5),
        ];

        let result = cumulative(&records);

        for window in result.windows(2) {
            assert!(window[0].1 <= window[1].1);
        }
        assert_eq!(result.last().unwrap().1, 12.5);
    }

    #[test]
    fn cumulative_handles_empty_input() {
        assert!(cumulative(&[]).is_empty());
    }
}
