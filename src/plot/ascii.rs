//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - a quick visual sanity check before opening the browser
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - actual sales: `-` line
//! - predicted sales: `o` markers (drawn last, so they win on overlap)

use chrono::NaiveDate;

use crate::domain::{PreparedSeries, SeriesPoint};

/// Render both series of `series` into a `width` x `height` character grid.
pub fn render_ascii_plot(series: &PreparedSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let dates = series.actual.iter().chain(series.predicted.iter()).map(|p| p.date);
    let (Some(origin), Some(last)) = (dates.clone().min(), dates.max()) else {
        return "Plot: (no data)\n".to_string();
    };

    let actual = to_xy(&series.actual, origin);
    let predicted = to_xy(&series.predicted, origin);

    let (x_min, x_max) = x_range(actual.iter().chain(predicted.iter())).unwrap_or((0.0, 0.0));
    let (y_min, y_max) = y_range(actual.iter().chain(predicted.iter())).unwrap_or((0.0, 0.0));
    // A single date still needs a non-empty x interval to map onto.
    let (x_min, x_max) = if x_max > x_min { (x_min, x_max) } else { (x_min - 1.0, x_max + 1.0) };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    draw_polyline(&mut grid, &actual, (x_min, x_max), (y_min, y_max), '-');

    for &(x, y) in &predicted {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {origin} .. {last} | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    out.push_str(&format!(
        "Legend: - actual, o predicted (from {})\n",
        series.cutoff
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn to_xy(points: &[SeriesPoint], origin: NaiveDate) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| ((p.date - origin).num_days() as f64, p.value))
        .collect()
}

fn x_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    bounds(points.map(|&(x, _)| x))
}

fn y_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    bounds(points.map(|&(_, y)| y))
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Widen `[min, max]` by `frac` of its span; a flat range is widened around its value.
fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { (min.abs() * frac).max(1.0) };
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
