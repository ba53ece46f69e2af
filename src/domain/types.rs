//! Shared domain types.
//!
//! Records are produced once by ingest and never mutated. The prepared series
//! are plain serializable values so they can be rendered, exported to CSV/JSON,
//! or compared in tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default input path (relative to the working directory).
pub const DEFAULT_INPUT: &str = "predicted_vs_actual_1.csv";

/// Default HTML output path (relative to the working directory).
pub const DEFAULT_OUTPUT: &str = "actual_vs_predicted_sales.html";

/// Predicted values dated before this are suppressed.
pub const DEFAULT_CUTOFF: &str = "2011-07-01";

pub const DEFAULT_TITLE: &str = "Actual vs Predicted Weekly Sales (2010-2012)";

/// One parsed input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted_20pct: Option<f64>,
}

/// A record after the cutoff has been applied to its predicted value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilteredRecord {
    pub date: NaiveDate,
    pub actual: f64,
    pub filtered_predicted: Option<f64>,
}

/// A single `(date, value)` sample of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// The two aligned series handed to rendering.
///
/// `actual` always has one point per input row. `predicted` only holds rows
/// dated on/after `cutoff` that carried a predicted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeries {
    pub cutoff: NaiveDate,
    pub actual: Vec<SeriesPoint>,
    pub predicted: Vec<SeriesPoint>,
}

impl PreparedSeries {
    /// First and last date of the actual series (the full input range).
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.actual.iter().map(|p| p.date).min()?;
        let max = self.actual.iter().map(|p| p.date).max()?;
        Some((min, max))
    }
}

/// Input column names. Matched case-insensitively against the CSV header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub date: String,
    pub actual: String,
    pub predicted: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            actual: "Actual".to_string(),
            predicted: "Predicted_20%".to_string(),
        }
    }
}

/// Chart text. Trace names double as legend entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub actual_name: String,
    pub predicted_name: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            x_title: "Date".to_string(),
            y_title: "Weekly Sales".to_string(),
            actual_name: "Actual Sales".to_string(),
            predicted_name: "Predicted Sales".to_string(),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cutoff: NaiveDate,
    pub columns: ColumnNames,
    pub labels: ChartLabels,
    pub open_browser: bool,
    pub preview: bool,
    pub preview_width: usize,
    pub preview_height: usize,
    pub export: Option<PathBuf>,
}
