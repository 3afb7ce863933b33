//! CSV import and export of expense records.
//!
//! The layout is `Category,Amount,Date`. Export always writes ISO dates and
//! two-digit decimals; import locates the columns by header name and accepts
//! the common calendar-date spellings spreadsheets produce.

use crate::models::{dollars_to_cents, format_cents, AmountError, Category, ExpenseRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::{Read, Write};

pub const HEADER: [&str; 3] = ["Category", "Amount", "Date"];

const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: unknown category '{value}'")]
    InvalidCategory { line: u64, value: String },
    #[error("line {line}: invalid amount '{value}': {reason}")]
    InvalidAmount {
        line: u64,
        value: String,
        reason: AmountError,
    },
    #[error("line {line}: could not parse date '{value}'")]
    InvalidDate { line: u64, value: String },
}

/// One data row as read from the file, before any field is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExpenseRow {
    pub line: u64,
    pub category: String,
    pub amount: String,
    pub date: String,
}

impl RawExpenseRow {
    pub fn parse(&self) -> Result<ExpenseRecord, ImportError> {
        let category = self
            .category
            .parse::<Category>()
            .map_err(|_| ImportError::InvalidCategory {
                line: self.line,
                value: self.category.clone(),
            })?;

        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| AmountError::NotANumber)
            .and_then(dollars_to_cents)
            .map_err(|reason| ImportError::InvalidAmount {
                line: self.line,
                value: self.amount.clone(),
                reason,
            })?;

        let date = parse_date(&self.date).ok_or_else(|| ImportError::InvalidDate {
            line: self.line,
            value: self.date.clone(),
        })?;

        Ok(ExpenseRecord::new(category, amount, date))
    }
}

struct ColumnMapping {
    category: usize,
    amount: usize,
    date: usize,
}

impl ColumnMapping {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(ImportError::MissingColumn(name))
        };
        Ok(Self {
            category: find(HEADER[0])?,
            amount: find(HEADER[1])?,
            date: find(HEADER[2])?,
        })
    }
}

/// Reads every data row. Structural problems (bad quoting, ragged rows,
/// missing columns) fail here; field values are checked by `parse_rows`.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawExpenseRow>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mapping = ColumnMapping::from_headers(reader.headers()?)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        rows.push(RawExpenseRow {
            line,
            category: field(mapping.category),
            amount: field(mapping.amount),
            date: field(mapping.date),
        });
    }
    Ok(rows)
}

/// All rows or nothing: the first bad field aborts.
pub fn parse_rows(rows: &[RawExpenseRow]) -> Result<Vec<ExpenseRecord>, ImportError> {
    rows.iter().map(RawExpenseRow::parse).collect()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive())
}

pub fn write_records<W: Write>(records: &[ExpenseRecord], writer: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(HEADER)?;
    for r in records {
        writer.write_record([
            r.category.as_str(),
            &format_cents(r.amount),
            &r.date.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_csv(records: &[ExpenseRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_records(records, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_layout() {
        let records = vec![
            ExpenseRecord::new(Category::Food, 10000, date(2024, 1, 5)),
            ExpenseRecord::new(Category::Transport, 1250, date(2024, 2, 29)),
        ];
        let out = String::from_utf8(export_csv(&records).unwrap()).unwrap();
        assert_eq!(
            out,
            "Category,Amount,Date\nFood,100.00,2024-01-05\nTransport,12.50,2024-02-29\n"
        );
    }

    #[test]
    fn test_export_empty_has_header() {
        let out = String::from_utf8(export_csv(&[]).unwrap()).unwrap();
        assert_eq!(out, "Category,Amount,Date\n");
    }

    #[test]
    fn test_export_then_import_preserves_records() {
        let records = vec![
            ExpenseRecord::new(Category::Books, 999, date(2023, 12, 31)),
            ExpenseRecord::new(Category::Books, 999, date(2023, 12, 31)),
            ExpenseRecord::new(Category::Entertainment, 1, date(2024, 7, 1)),
            ExpenseRecord::new(Category::Other, 123456, date(1999, 1, 1)),
        ];
        let bytes = export_csv(&records).unwrap();
        let rows = read_rows(bytes.as_slice()).unwrap();
        assert_eq!(parse_rows(&rows).unwrap(), records);
    }

    #[test]
    fn test_import_columns_by_name() {
        let input = "date, amount ,Note,CATEGORY\n01/15/2024,42.5,lunch,food\n";
        let rows = read_rows(input.as_bytes()).unwrap();
        assert_eq!(rows[0].line, 2);
        let parsed = parse_rows(&rows).unwrap();
        assert_eq!(parsed, vec![ExpenseRecord::new(Category::Food, 4250, date(2024, 1, 15))]);
    }

    #[test]
    fn test_import_missing_column() {
        let err = read_rows("Category,Amount\nFood,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("Date")));
    }

    #[test]
    fn test_import_ragged_row_fails() {
        assert!(read_rows("Category,Amount,Date\nFood,1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_import_reports_bad_date_with_line() {
        let input = "Category,Amount,Date\nFood,1,2024-01-01\nFood,2,not-a-date\n";
        let rows = read_rows(input.as_bytes()).unwrap();
        let err = parse_rows(&rows).unwrap_err();
        assert_eq!(err.to_string(), "line 3: could not parse date 'not-a-date'");
    }

    #[test]
    fn test_import_rejects_bad_amount_and_category() {
        let rows = read_rows("Category,Amount,Date\nFood,abc,2024-01-01\n".as_bytes()).unwrap();
        assert!(matches!(parse_rows(&rows), Err(ImportError::InvalidAmount { line: 2, .. })));

        let rows = read_rows("Category,Amount,Date\nRent,1,2024-01-01\n".as_bytes()).unwrap();
        assert!(matches!(parse_rows(&rows), Err(ImportError::InvalidCategory { line: 2, .. })));
    }

    #[test]
    fn test_import_rejects_amounts_that_cannot_be_stored() {
        let rows = read_rows("Category,Amount,Date\nFood,1,2024-01-01\nFood,1e30,2024-01-01\n".as_bytes()).unwrap();
        let err = parse_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidAmount { line: 3, reason: AmountError::OutOfRange, .. }
        ));
        assert_eq!(err.to_string(), "line 3: invalid amount '1e30': Amount is too large");

        let rows = read_rows("Category,Amount,Date\nFood,12.345,2024-01-01\n".as_bytes()).unwrap();
        assert!(matches!(
            parse_rows(&rows),
            Err(ImportError::InvalidAmount { line: 2, reason: AmountError::SubCent, .. })
        ));

        let rows = read_rows("Category,Amount,Date\nFood,0.004,2024-01-01\n".as_bytes()).unwrap();
        assert!(parse_rows(&rows).is_err());
    }

    #[test]
    fn test_import_keeps_non_positive_amounts() {
        let rows = read_rows("Category,Amount,Date\nOther,-3.5,2024-01-01\nFood,0,2024-01-02\n".as_bytes()).unwrap();
        let parsed = parse_rows(&rows).unwrap();
        assert_eq!(parsed[0].amount, -350);
        assert_eq!(parsed[1].amount, 0);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = date(2024, 3, 7);
        for input in [
            "2024-03-07",
            "2024/03/07",
            "2024.03.07",
            "03/07/2024",
            "07.03.2024",
            "March 7, 2024",
            "Mar 7, 2024",
            "7 March 2024",
            "7 Mar 2024",
            "2024-03-07 00:00:00",
            "2024-03-07T13:45:10.250",
            "2024-03-07T13:45:10+02:00",
        ] {
            assert_eq!(parse_date(input), Some(expected), "input {input}");
        }
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }
}
