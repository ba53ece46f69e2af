//! Formatted terminal output.
//!
//! Formatting lives in one place so output changes stay localized and the
//! series code stays free of presentation concerns.

use chrono::NaiveDate;

use crate::domain::{ChartConfig, PreparedSeries, SalesRecord};
use crate::io::ingest::IngestedData;
use crate::series::{PredictedBreakdown, filter_predicted};

/// Format the run summary (input, date range, cutoff, series sizes).
pub fn format_run_summary(
    ingest: &IngestedData,
    series: &PreparedSeries,
    breakdown: &PredictedBreakdown,
    config: &ChartConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== sales-chart - Actual vs Predicted Weekly Sales ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!("Rows: {}\n", ingest.rows_read));
    match series.date_range() {
        Some((min, max)) => out.push_str(&format!("Dates: {min} .. {max}\n")),
        None => out.push_str("Dates: (none)\n"),
    }
    if !ingest.dates_ascending {
        out.push_str("Note: input dates are not ascending (file order kept)\n");
    }
    out.push_str(&format!("Cutoff: {}\n", series.cutoff));

    out.push_str(&format!("Actual points: {}\n", series.actual.len()));
    out.push_str(&format!(
        "Predicted points: {} (before cutoff: {}, missing: {})\n",
        breakdown.kept, breakdown.before_cutoff, breakdown.missing
    ));

    out
}

/// Format the last `limit` rows that kept a predicted value, next to that row's actual value.
pub fn format_predicted_table(records: &[SalesRecord], cutoff: NaiveDate, limit: usize) -> String {
    let rows: Vec<(NaiveDate, f64, f64)> = filter_predicted(records, cutoff)
        .filter_map(|r| r.filtered_predicted.map(|p| (r.date, r.actual, p)))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>14} {:>14} {:>14}\n", "date", "actual", "predicted", "diff"));
    out.push_str(&format!("{:-<10} {:-<14} {:-<14} {:-<14}\n", "", "", "", ""));

    let skip = rows.len().saturating_sub(limit);
    for &(date, actual, predicted) in rows.iter().skip(skip) {
        out.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>14}\n",
            date,
            fmt_sales(actual),
            fmt_sales(predicted),
            fmt_sales(predicted - actual)
        ));
    }

    out
}

/// Two decimals with thousands separators, e.g. `1,234,567.89`.
fn fmt_sales(v: f64) -> String {
    let raw = format!("{:.2}", v.abs());
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if v < 0.0 && raw != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
