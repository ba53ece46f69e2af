//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed input rows (`SalesRecord`) and their cutoff-filtered form (`FilteredRecord`)
//! - the prepared output series (`SeriesPoint`, `PreparedSeries`)
//! - run configuration (`ChartConfig`, `ColumnNames`, `ChartLabels`)

pub mod types;

pub use types::*;
