//! Standalone HTML output.
//!
//! plotly renders the page itself; with the `plotly_embed_js` feature the
//! plotly.js bundle is inlined, so the file works offline.

use std::fs;
use std::path::Path;

use plotly::Plot;
use tracing::debug;

use crate::error::AppError;

/// Render the full HTML document for `plot`.
pub fn render_html(plot: &Plot) -> String {
    plot.to_html()
}

/// Render and write the document to `path`.
pub fn write_html(path: &Path, plot: &Plot) -> Result<(), AppError> {
    fs::write(path, render_html(plot))
        .map_err(|e| AppError::io(format!("Failed to write chart HTML '{}': {e}", path.display())))
}

/// Write `plot` to `path` and hand the file to the system's default browser.
pub fn show_in_browser(path: &Path, plot: &Plot) -> Result<(), AppError> {
    // plotly panics on non UTF-8 paths; report those instead.
    if path.to_str().is_none() {
        return Err(AppError::io(format!(
            "Cannot open '{}' in a browser: path is not valid UTF-8",
            path.display()
        )));
    }
    debug!(path = %path.display(), "opening chart in browser");
    plot.show_html(path);
    Ok(())
}
