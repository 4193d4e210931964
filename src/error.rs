//! Defines the crate level error type.
use time::Date;

/// The errors that may occur while ingesting or analysing expense data.
///
/// Row-level parse failures are deliberately *not* represented here: a row
/// with an unparseable date or amount is dropped and counted by the ingestion
/// step so callers can warn the user, rather than aborting the whole input.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required column is missing from the input header row.
    ///
    /// This is fatal for the entire ingestion: without the column there is no
    /// way to tell which rows are salvageable, so no partial dataset is
    /// produced.
    #[error("the CSV input is missing the required column \"{0}\"")]
    MissingColumn(String),

    /// The CSV had structural issues that prevented it from being read at all.
    #[error("could not parse the CSV input: {0}")]
    InvalidCsv(String),

    /// The filtered records could not be re-serialised for download.
    #[error("could not export the CSV data: {0}")]
    CsvExport(String),

    /// A filter date range whose start falls after its end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// The requested start of the range.
        start: Date,
        /// The requested end of the range.
        end: Date,
    },
}
