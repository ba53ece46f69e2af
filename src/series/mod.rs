//! Actual/predicted series preparation.
//!
//! Two steps, both pure and row-independent:
//!
//! 1. `filter_predicted` blanks out predicted values dated before the cutoff.
//! 2. `drop_missing_filtered` keeps only rows that still carry a value.
//!
//! The actual series is never filtered.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{FilteredRecord, PreparedSeries, SalesRecord, SeriesPoint};

/// Apply the cutoff to every record's predicted value.
///
/// Yields one `FilteredRecord` per input record, in input order.
pub fn filter_predicted(
    records: &[SalesRecord],
    cutoff: NaiveDate,
) -> impl Iterator<Item = FilteredRecord> + '_ {
    records.iter().map(move |r| FilteredRecord {
        date: r.date,
        actual: r.actual,
        filtered_predicted: if r.date >= cutoff { r.predicted_20pct } else { None },
    })
}

/// Keep only records that have a filtered predicted value, as `(date, value)` points.
pub fn drop_missing_filtered<I>(records: I) -> impl Iterator<Item = SeriesPoint>
where
    I: IntoIterator<Item = FilteredRecord>,
{
    records
        .into_iter()
        .filter_map(|r| r.filtered_predicted.map(|v| SeriesPoint::new(r.date, v)))
}

/// Every record as a `(date, actual)` point.
pub fn actual_series(records: &[SalesRecord]) -> Vec<SeriesPoint> {
    records.iter().map(|r| SeriesPoint::new(r.date, r.actual)).collect()
}

/// Counts describing why predicted values were left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PredictedBreakdown {
    /// Rows with a predicted value that survived the cutoff.
    pub kept: usize,
    /// Rows dated before the cutoff (whether or not they had a value).
    pub before_cutoff: usize,
    /// Rows on/after the cutoff with no predicted value.
    pub missing: usize,
}

/// Builds the actual and cutoff-filtered predicted series for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SalesSeriesPreparer {
    cutoff: NaiveDate,
}

impl SalesSeriesPreparer {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn prepare(&self, records: &[SalesRecord]) -> PreparedSeries {
        let actual = actual_series(records);
        let predicted: Vec<SeriesPoint> =
            drop_missing_filtered(filter_predicted(records, self.cutoff)).collect();

        debug!(
            cutoff = %self.cutoff,
            actual = actual.len(),
            predicted = predicted.len(),
            "prepared series"
        );

        PreparedSeries {
            cutoff: self.cutoff,
            actual,
            predicted,
        }
    }

    pub fn breakdown(&self, records: &[SalesRecord]) -> PredictedBreakdown {
        records.iter().fold(PredictedBreakdown::default(), |mut acc, r| {
            if r.date < self.cutoff {
                acc.before_cutoff += 1;
            } else if r.predicted_20pct.is_some() {
                acc.kept += 1;
            } else {
                acc.missing += 1;
            }
            acc
        })
    }
}
