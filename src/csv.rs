//! Functions to parse and re-serialise expense CSV data.
//!
//! The wire format is a header row of `Date, Category, Amount, Payment
//! Method, Description` followed by one row per expense. Ingestion is
//! tolerant of bad rows (dropped and counted) but strict about the header:
//! a missing required column fails the whole input with no partial dataset.

use ::csv::{ReaderBuilder, Writer};

use crate::{
    Error,
    record::{DATE_FORMAT, ExpenseRecord},
};

/// The columns every expense CSV must provide, in the canonical export order.
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["Date", "Category", "Amount", "Payment Method", "Description"];

/// The outcome of ingesting a CSV document.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvImport {
    /// The validated records, in input order. May be empty.
    pub records: Vec<ExpenseRecord>,
    /// How many rows were rejected for an unparseable date or amount.
    ///
    /// Rejection is silent at the data level; callers should surface this
    /// count to the user when it is non-zero.
    pub rows_dropped: usize,
}

/// Parses expense records from CSV text.
///
/// Columns may appear in any order; they are matched by header name. Rows
/// whose date or amount cannot be parsed are dropped and counted in
/// [CsvImport::rows_dropped], never coerced to defaults.
///
/// Returns [Error::MissingColumn] when a required column is absent from the
/// header row, which fails the entire ingestion.
pub fn parse_expenses_csv(text: &str) -> Result<CsvImport, Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?
        .clone();

    let mut columns = [0usize; REQUIRED_COLUMNS.len()];

    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| Error::MissingColumn(name.to_owned()))?;
    }

    let [date_column, category_column, amount_column, payment_column, description_column] = columns;

    let mut records = Vec::new();
    let mut rows_dropped = 0;

    for (row_number, row) in reader.records().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let line_number = row_number + 2;

        let row = match row {
            Ok(row) => row,
            Err(error) => {
                tracing::debug!("Dropping unreadable row on line {line_number}: {error}");
                rows_dropped += 1;
                continue;
            }
        };

        let field = |column: usize| row.get(column).unwrap_or("");

        match ExpenseRecord::parse(
            field(date_column),
            field(category_column),
            field(amount_column),
            field(payment_column),
            field(description_column),
        ) {
            Some(record) => records.push(record),
            None => {
                tracing::debug!(
                    "Dropping row on line {line_number}: date '{}' or amount '{}' is unparseable",
                    field(date_column),
                    field(amount_column)
                );
                rows_dropped += 1;
            }
        }
    }

    Ok(CsvImport {
        records,
        rows_dropped,
    })
}

/// Serialises records back to the input column layout.
///
/// The round trip through [parse_expenses_csv] is lossless for every field.
/// Derived values such as month buckets and cumulative sums are not exported.
pub fn write_expenses_csv(records: &[ExpenseRecord]) -> Result<String, Error> {
    let mut writer = Writer::from_writer(Vec::new());

    writer
        .write_record(REQUIRED_COLUMNS)
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    for record in records {
        let date = record
            .date
            .format(&DATE_FORMAT)
            .map_err(|error| Error::CsvExport(error.to_string()))?;

        // f64 Display produces the shortest representation that parses back
        // to the same value, keeping the round trip lossless.
        let amount = record.amount.to_string();

        writer
            .write_record([
                date.as_str(),
                record.category.as_str(),
                amount.as_str(),
                record.payment_method.as_str(),
                record.description.as_str(),
            ])
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvExport(error.to_string()))
}
