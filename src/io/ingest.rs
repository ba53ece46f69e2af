//! CSV ingest.
//!
//! Turns the weekly sales CSV into `SalesRecord`s. Unlike a lenient loader,
//! nothing is skipped here: the first bad cell aborts the run with a
//! `Parse` error naming the line, and a missing column aborts with `Schema`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{ColumnNames, SalesRecord};
use crate::error::AppError;

/// Cell values treated as "no predicted value" (pandas' default NA strings, matched exactly).
const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
    "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Ingest output: parsed records plus a little bookkeeping for reports.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<SalesRecord>,
    pub rows_read: usize,
    /// `true` when every date is >= the one on the previous row.
    pub dates_ascending: bool,
}

impl IngestedData {
    pub fn predicted_present(&self) -> usize {
        self.records.iter().filter(|r| r.predicted_20pct.is_some()).count()
    }
}

/// Resolved header positions of the three required columns.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    actual: usize,
    predicted: usize,
}

/// Open `path` and parse it as a sales CSV.
pub fn load_sales_records(path: &Path, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::file_not_found(format!("Input CSV not found: '{}'", path.display()))
        } else {
            AppError::io(format!("Failed to open CSV '{}': {e}", path.display()))
        }
    })?;

    debug!(path = %path.display(), "reading sales CSV");
    read_sales_records(file, columns)
}

/// Parse sales records from any reader (file, in-memory buffer, stdin).
pub fn read_sales_records<R: Read>(input: R, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let index = resolve_columns(&build_header_map(&headers), columns)?;

    let mut records = Vec::new();
    let mut dates_ascending = true;
    let mut prev_date: Option<NaiveDate> = None;

    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::parse(format!("CSV parse error: {e}")))?;
        // Header is line 1, so the first record sits on line 2 unless the
        // reader knows better (quoted multi-line fields).
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let row = parse_row(&record, index, columns)
            .map_err(|msg| AppError::parse(format!("Line {line}: {msg}")))?;

        if let Some(prev) = prev_date {
            if row.date < prev && dates_ascending {
                warn!(line, date = %row.date, previous = %prev, "dates are not ascending; keeping file order");
                dates_ascending = false;
            }
        }
        prev_date = Some(row.date);
        records.push(row);
    }

    if records.is_empty() {
        return Err(AppError::schema("Input CSV has a header but no data rows."));
    }

    let rows_read = records.len();
    debug!(rows_read, "parsed sales records");

    Ok(IngestedData {
        records,
        rows_read,
        dates_ascending,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>, columns: &ColumnNames) -> Result<ColumnIndex, AppError> {
    let find = |name: &str| {
        header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| AppError::schema(format!("Missing required column: `{name}`")))
    };

    Ok(ColumnIndex {
        date: find(&columns.date)?,
        actual: find(&columns.actual)?,
        predicted: find(&columns.predicted)?,
    })
}

fn parse_row(record: &StringRecord, index: ColumnIndex, columns: &ColumnNames) -> Result<SalesRecord, String> {
    let date = parse_date(get_required(record, index.date, &columns.date)?)?;

    let actual_raw = get_required(record, index.actual, &columns.actual)?;
    let actual = parse_number(actual_raw).ok_or_else(|| {
        format!("Invalid `{}` value '{actual_raw}' (expected a finite number).", columns.actual)
    })?;

    let predicted_20pct = match get_optional(record, index.predicted) {
        None => None,
        Some(raw) if is_missing_token(raw) => None,
        Some(raw) => Some(parse_number(raw).ok_or_else(|| {
            format!(
                "Invalid `{}` value '{raw}' (expected a number or blank).",
                columns.predicted
            )
        })?),
    };

    Ok(SalesRecord {
        date,
        actual,
        predicted_20pct,
    })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    get_optional(record, idx).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn is_missing_token(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

/// Parse a calendar date.
///
/// ISO dates (`YYYY-MM-DD`) are preferred. Slash dates are read month-first,
/// dash dates with a trailing year day-first. ISO datetimes are accepted and
/// truncated to their date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FMTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY, DD-MM-YYYY, YYYY-MM-DD HH:MM:SS."
    ))
}

fn parse_number(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn read(csv: &str) -> Result<IngestedData, AppError> {
        read_sales_records(csv.as_bytes(), &ColumnNames::default())
    }

    #[test]
    fn reads_rows_in_file_order() {
        let data = read(
            "Date,Actual,Predicted_20%\n\
             2011-06-01,100,90\n\
             2011-08-01,110,95\n\
             2011-09-01,120,\n",
        )
        .unwrap();

        assert_eq!(data.rows_read, 3);
        assert!(data.dates_ascending);
        assert_eq!(
            data.records,
            vec![
                SalesRecord { date: d(2011, 6, 1), actual: 100.0, predicted_20pct: Some(90.0) },
                SalesRecord { date: d(2011, 8, 1), actual: 110.0, predicted_20pct: Some(95.0) },
                SalesRecord { date: d(2011, 9, 1), actual: 120.0, predicted_20pct: None },
            ]
        );
        assert_eq!(data.predicted_present(), 2);
    }

    #[test]
    fn headers_match_case_insensitively_and_ignore_bom() {
        let data = read("\u{feff}date, ACTUAL ,predicted_20%,Store\n2010-02-05,24924.5,NaN,1\n").unwrap();
        assert_eq!(data.records[0].actual, 24924.5);
        assert_eq!(data.records[0].predicted_20pct, None);
    }

    #[test]
    fn extra_columns_and_column_order_do_not_matter() {
        let data = read("Store,Predicted_20%,Actual,Date\n1,5.5,7,2011-07-01\n").unwrap();
        assert_eq!(
            data.records[0],
            SalesRecord { date: d(2011, 7, 1), actual: 7.0, predicted_20pct: Some(5.5) }
        );
    }

    #[test]
    fn missing_column_is_schema_error() {
        let err = read("Date,Actual\n2011-01-01,1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(err.to_string().contains("Predicted_20%"));
    }

    #[test]
    fn header_only_is_schema_error() {
        let err = read("Date,Actual,Predicted_20%\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn bad_date_is_parse_error_with_line() {
        let err = read("Date,Actual,Predicted_20%\n2011-01-01,1,1\nyesterday,2,2\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("Line 3:"), "{err}");
    }

    #[test]
    fn bad_actual_is_parse_error() {
        let err = read("Date,Actual,Predicted_20%\n2011-01-01,lots,1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = read("Date,Actual,Predicted_20%\n2011-01-01,,1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn bad_predicted_is_parse_error_but_tokens_are_missing() {
        let err = read("Date,Actual,Predicted_20%\n2011-01-01,1,abc\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let data = read("Date,Actual,Predicted_20%\n2011-01-01,1,NA\n2011-01-08,1,null\n2011-01-15,1\n").unwrap();
        assert!(data.records.iter().all(|r| r.predicted_20pct.is_none()));
    }

    #[test]
    fn spreadsheet_error_tokens_are_missing() {
        let data = read(
            "Date,Actual,Predicted_20%\n\
             2011-01-01,1,#NA\n\
             2011-01-08,1,#N/A N/A\n\
             2011-01-15,1,-1.#IND\n\
             2011-01-22,1,1.#QNAN\n\
             2011-01-29,1,<NA>\n",
        )
        .unwrap();
        assert_eq!(data.records.len(), 5);
        assert!(data.records.iter().all(|r| r.predicted_20pct.is_none()));
    }

    #[test]
    fn missing_tokens_are_case_sensitive() {
        let err = read("Date,Actual,Predicted_20%\n2011-01-01,1,Null\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = read("Date,Actual,Predicted_20%\n2011-01-01,1,NaT\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn unsorted_dates_are_kept_but_flagged() {
        let data = read("Date,Actual,Predicted_20%\n2011-02-01,1,\n2011-01-01,2,\n").unwrap();
        assert!(!data.dates_ascending);
        assert_eq!(data.records[0].date, d(2011, 2, 1));
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2011-07-01").unwrap(), d(2011, 7, 1));
        assert_eq!(parse_date("2011/07/01").unwrap(), d(2011, 7, 1));
        assert_eq!(parse_date("07/01/2011").unwrap(), d(2011, 7, 1));
        assert_eq!(parse_date("01-07-2011").unwrap(), d(2011, 7, 1));
        assert_eq!(parse_date("2011-07-01 00:00:00").unwrap(), d(2011, 7, 1));
        assert_eq!(parse_date("2011-07-01T13:30:00").unwrap(), d(2011, 7, 1));
        assert!(parse_date("2011-13-01").is_err());
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let path = std::env::temp_dir().join("sales-chart-definitely-missing-input.csv");
        let err = load_sales_records(&path, &ColumnNames::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }
}
