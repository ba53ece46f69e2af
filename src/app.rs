//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the CSV and prepares both series
//! - writes the HTML chart and opens it (or prints an inspection report)
//! - writes optional exports

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, InputArgs, InspectArgs, RenderArgs};
use crate::domain::{ChartConfig, ChartLabels, ColumnNames};
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_LOG_FILTER: &str = "sales_chart=info";

/// Entry point for the `sales-chart` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `sales-chart` and `sales-chart --input x.csv` behave like `sales-chart render ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let config = render_config_from_args(&args);
    let run = pipeline::run_prepare(&config)?;

    if config.preview {
        println!(
            "{}",
            crate::report::format_run_summary(&run.ingest, &run.series, &run.breakdown, &config)
        );
        println!(
            "{}",
            crate::plot::render_ascii_plot(&run.series, config.preview_width, config.preview_height)
        );
    }

    if let Some(path) = &config.export {
        crate::io::export::write_series(path, &run.ingest.records, &run.series)?;
        info!(path = %path.display(), "series exported");
    }

    let plot = pipeline::write_chart(&config.output, &run, &config)?;

    if config.open_browser {
        // The chart is already on disk; failing to show it is not fatal.
        if let Err(err) = crate::chart::show_in_browser(&config.output, &plot) {
            warn!(error = %err, "could not open the chart in a browser");
        }
    }

    Ok(())
}

fn handle_inspect(args: InspectArgs) -> Result<(), AppError> {
    let config = config_from_input_args(&args.input);
    let run = pipeline::run_prepare(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.series, &run.breakdown, &config)
    );
    println!(
        "{}",
        crate::report::format_predicted_table(&run.ingest.records, run.series.cutoff, args.rows)
    );
    println!(
        "{}",
        crate::plot::render_ascii_plot(&run.series, config.preview_width, config.preview_height)
    );

    if let Some(path) = &config.export {
        crate::io::export::write_series(path, &run.ingest.records, &run.series)?;
        info!(path = %path.display(), "series exported");
    }

    Ok(())
}

pub fn render_config_from_args(args: &RenderArgs) -> ChartConfig {
    let mut config = config_from_input_args(&args.input);
    config.output = args.output.clone();
    config.labels.title = args.title.clone();
    config.open_browser = !args.no_open;
    config.preview = args.preview;
    config
}

pub fn config_from_input_args(args: &InputArgs) -> ChartConfig {
    ChartConfig {
        input: args.input.clone(),
        output: crate::domain::DEFAULT_OUTPUT.into(),
        cutoff: args.cutoff,
        columns: ColumnNames {
            date: args.date_column.clone(),
            actual: args.actual_column.clone(),
            predicted: args.predicted_column.clone(),
        },
        labels: ChartLabels::default(),
        open_browser: false,
        preview: false,
        preview_width: args.width,
        preview_height: args.height,
        export: args.export.clone(),
    }
}

/// Rewrite argv so `sales-chart` defaults to `sales-chart render`.
///
/// Rules:
/// - `sales-chart`                      -> `sales-chart render`
/// - `sales-chart --input x.csv ...`    -> `sales-chart render --input x.csv ...`
/// - `sales-chart --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("render".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "render" | "inspect");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "render flags".
    if arg1.starts_with('-') {
        argv.insert(1, "render".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
