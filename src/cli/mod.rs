//! Command-line parsing for the sales chart renderer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! series preparation and rendering code. Paths and the cutoff can also be set
//! through the environment (or a `.env` file).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_CUTOFF, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_TITLE};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sales-chart",
    version,
    about = "Render actual vs predicted weekly sales as an interactive HTML chart"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the interactive HTML chart and open it in the browser (default).
    Render(RenderArgs),
    /// Print the run summary, a predicted-vs-actual table and a terminal plot.
    ///
    /// Nothing is written except an optional `--export`.
    Inspect(InspectArgs),
}

/// Input and series options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Sales CSV with date, actual and predicted columns.
    #[arg(short, long, env = "SALES_CHART_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Predicted values dated before this day are dropped (YYYY-MM-DD).
    #[arg(long, env = "SALES_CHART_CUTOFF", default_value = DEFAULT_CUTOFF, value_parser = parse_cutoff)]
    pub cutoff: NaiveDate,

    /// Name of the date column.
    #[arg(long, default_value = "Date")]
    pub date_column: String,

    /// Name of the actual sales column.
    #[arg(long, default_value = "Actual")]
    pub actual_column: String,

    /// Name of the predicted sales column.
    #[arg(long, default_value = "Predicted_20%")]
    pub predicted_column: String,

    /// Export the prepared series (`.json` for JSON, anything else for CSV).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Terminal plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

/// Options for `render`.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// HTML file to write.
    #[arg(short, long, env = "SALES_CHART_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Chart title.
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Do not open the chart in the browser.
    #[arg(long)]
    pub no_open: bool,

    /// Also print the run summary and a terminal plot.
    #[arg(long)]
    pub preview: bool,
}

/// Options for `inspect`.
#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of trailing predicted rows to list.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

fn parse_cutoff(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid cutoff '{s}' (expected YYYY-MM-DD): {e}"))
}
