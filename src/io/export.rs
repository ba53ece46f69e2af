//! Export the prepared series to CSV or JSON.
//!
//! CSV is one row per input record with the predicted cell left blank where
//! the value was filtered out, which is easy to drop into a spreadsheet.
//! JSON mirrors `PreparedSeries` directly.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{FilteredRecord, PreparedSeries, SalesRecord};
use crate::error::AppError;
use crate::series::filter_predicted;

#[derive(Debug, Serialize)]
struct ExportRow {
    date: NaiveDate,
    actual: f64,
    predicted: Option<f64>,
}

/// Write the prepared data to `path`, choosing the format from the extension.
///
/// `records` are the parsed input rows `series` was prepared from.
pub fn write_series(path: &Path, records: &[SalesRecord], series: &PreparedSeries) -> Result<(), AppError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        write_series_json(path, series)
    } else {
        write_series_csv(path, records, series.cutoff)
    }
}

pub fn write_series_json(path: &Path, series: &PreparedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, series)
        .map_err(|e| AppError::io(format!("Failed to write export JSON: {e}")))
}

pub fn write_series_csv(path: &Path, records: &[SalesRecord], cutoff: NaiveDate) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in filter_predicted(records, cutoff).map(ExportRow::from) {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))
}

impl From<FilteredRecord> for ExportRow {
    fn from(r: FilteredRecord) -> Self {
        Self {
            date: r.date,
            actual: r.actual,
            predicted: r.filtered_predicted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesPoint;
    use crate::series::SalesSeriesPreparer;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(date: NaiveDate, actual: f64, predicted: Option<f64>) -> SalesRecord {
        SalesRecord {
            date,
            actual,
            predicted_20pct: predicted,
        }
    }

    fn records() -> Vec<SalesRecord> {
        vec![
            record(d(2011, 6, 1), 100.0, Some(90.0)),
            record(d(2011, 8, 1), 110.0, Some(95.0)),
            record(d(2011, 9, 1), 120.0, None),
        ]
    }

    fn series() -> PreparedSeries {
        PreparedSeries {
            cutoff: d(2011, 7, 1),
            actual: vec![
                SeriesPoint::new(d(2011, 6, 1), 100.0),
                SeriesPoint::new(d(2011, 8, 1), 110.0),
                SeriesPoint::new(d(2011, 9, 1), 120.0),
            ],
            predicted: vec![SeriesPoint::new(d(2011, 8, 1), 95.0)],
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sales-chart-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_export_blanks_filtered_rows() {
        let path = temp_path("export.csv");
        write_series(&path, &records(), &series()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            text,
            "date,actual,predicted\n2011-06-01,100.0,\n2011-08-01,110.0,95.0\n2011-09-01,120.0,\n"
        );
    }

    #[test]
    fn csv_export_keeps_each_row_of_a_repeated_date() {
        let records = vec![
            record(d(2011, 8, 5), 110.0, Some(95.0)),
            record(d(2011, 8, 5), 111.0, None),
        ];
        let series = SalesSeriesPreparer::new(d(2011, 7, 1)).prepare(&records);

        let path = temp_path("export-repeated.csv");
        write_series(&path, &records, &series).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(
            text,
            "date,actual,predicted\n2011-08-05,110.0,95.0\n2011-08-05,111.0,\n"
        );
    }

    #[test]
    fn json_export_round_trips() {
        let path = temp_path("export.json");
        write_series(&path, &records(), &series()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let back: PreparedSeries = serde_json::from_str(&text).unwrap();
        assert_eq!(back, series());
    }
}
