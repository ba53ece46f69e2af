//! Shared pipeline logic used by both `render` and `inspect`.
//!
//! load CSV -> prepare series -> (render HTML)
//!
//! The subcommands then only decide what to print or write.

use std::path::Path;

use plotly::Plot;
use tracing::info;

use crate::domain::{ChartConfig, PreparedSeries};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_sales_records};
use crate::series::{PredictedBreakdown, SalesSeriesPreparer};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub series: PreparedSeries,
    pub breakdown: PredictedBreakdown,
}

/// Load the input CSV and prepare both series.
pub fn run_prepare(config: &ChartConfig) -> Result<RunOutput, AppError> {
    let ingest = load_sales_records(&config.input, &config.columns)?;
    Ok(prepare_ingested(ingest, config))
}

/// Prepare series from already-loaded records.
pub fn prepare_ingested(ingest: IngestedData, config: &ChartConfig) -> RunOutput {
    let preparer = SalesSeriesPreparer::new(config.cutoff);
    let series = preparer.prepare(&ingest.records);
    let breakdown = preparer.breakdown(&ingest.records);

    info!(
        rows = ingest.rows_read,
        actual = series.actual.len(),
        predicted = series.predicted.len(),
        cutoff = %config.cutoff,
        "series prepared"
    );

    RunOutput {
        ingest,
        series,
        breakdown,
    }
}

/// Build the plot for `run` and write it as HTML to `path`.
///
/// The plot is handed back so the caller can also show it.
pub fn write_chart(path: &Path, run: &RunOutput, config: &ChartConfig) -> Result<Plot, AppError> {
    let plot = crate::chart::build_plot(&run.series, &config.labels);
    crate::chart::write_html(path, &plot)?;
    info!(path = %path.display(), "chart written");
    Ok(plot)
}
