//! Plotly figure construction.
//!
//! Two scatter traces over a date axis with a range slider, range-selector
//! buttons and a row of relayout buttons pinning fixed look-back windows.

use chrono::{Duration, NaiveDate};
use plotly::common::{Anchor, HoverInfo, Line, Mode, Orientation, Title};
use plotly::layout::update_menu::{Button, ButtonMethod, UpdateMenu, UpdateMenuDirection, UpdateMenuType};
use plotly::layout::{
    Axis, AxisType, HoverMode, Legend, RangeSelector, RangeSlider, SelectorButton, SelectorStep, StepMode,
};
use plotly::{Layout, Plot, Scatter};
use serde_json::json;

use crate::domain::{ChartLabels, PreparedSeries, SeriesPoint};

const ACTUAL_COLOR: &str = "blue";
const PREDICTED_COLOR: &str = "red";
const GRID_COLOR: &str = "#EBF0F8";
const HOVER_TEMPLATE: &str = "<b>%{x}</b><br>%{y:,.0f}<extra></extra>";

/// A relayout button that pins the x-axis to `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePreset {
    pub label: &'static str,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Zoom presets anchored on the last date: everything, then fixed look-backs.
pub fn range_presets(min: NaiveDate, max: NaiveDate) -> Vec<RangePreset> {
    const LOOKBACKS: [(&str, i64); 3] = [("Last Year", 365), ("Last 6 Months", 180), ("Last Month", 30)];

    let mut presets = vec![RangePreset {
        label: "All",
        start: min,
        end: max,
    }];
    presets.extend(LOOKBACKS.iter().map(|&(label, days)| RangePreset {
        label,
        start: max - Duration::days(days),
        end: max,
    }));
    presets
}

/// Build the complete plot for the prepared series.
pub fn build_plot(series: &PreparedSeries, labels: &ChartLabels) -> Plot {
    let mut plot = Plot::new();
    plot.add_trace(scatter_trace(&series.actual, &labels.actual_name, ACTUAL_COLOR, Mode::Lines));
    plot.add_trace(scatter_trace(
        &series.predicted,
        &labels.predicted_name,
        PREDICTED_COLOR,
        Mode::LinesMarkers,
    ));

    let mut layout = Layout::new()
        .title(Title::with_text(&labels.title))
        .plot_background_color("white")
        .paper_background_color("white")
        .hover_mode(HoverMode::Closest)
        .x_axis(
            Axis::new()
                .title(Title::with_text(&labels.x_title))
                .type_(AxisType::Date)
                .grid_color(GRID_COLOR)
                .zero_line_color(GRID_COLOR)
                .range_slider(RangeSlider::new().visible(true))
                .range_selector(RangeSelector::new().buttons(range_selector_buttons())),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text(&labels.y_title))
                .grid_color(GRID_COLOR)
                .zero_line_color(GRID_COLOR),
        )
        .legend(
            Legend::new()
                .orientation(Orientation::Horizontal)
                .y_anchor(Anchor::Bottom)
                .y(1.02)
                .x_anchor(Anchor::Right)
                .x(1.0),
        );

    if let Some((min, max)) = series.date_range() {
        layout = layout.update_menus(vec![
            UpdateMenu::new()
                .ty(UpdateMenuType::Buttons)
                .direction(UpdateMenuDirection::Right)
                .active(0)
                .x(0.1)
                .y(1.2)
                .buttons(relayout_buttons(&range_presets(min, max))),
        ]);
    }

    plot.set_layout(layout);
    plot
}

fn scatter_trace(points: &[SeriesPoint], name: &str, color: &'static str, mode: Mode) -> Box<Scatter<String, f64>> {
    let x: Vec<String> = points.iter().map(|p| p.date.format("%Y-%m-%d").to_string()).collect();
    let y: Vec<f64> = points.iter().map(|p| p.value).collect();
    Scatter::new(x, y)
        .name(name)
        .mode(mode)
        .line(Line::new().color(color))
        .hover_info(HoverInfo::XAndY)
        .hover_template(HOVER_TEMPLATE)
}

fn range_selector_buttons() -> Vec<SelectorButton> {
    vec![
        SelectorButton::new()
            .count(1)
            .label("1m")
            .step(SelectorStep::Month)
            .step_mode(StepMode::Backward),
        SelectorButton::new()
            .count(6)
            .label("6m")
            .step(SelectorStep::Month)
            .step_mode(StepMode::Backward),
        SelectorButton::new()
            .count(1)
            .label("YTD")
            .step(SelectorStep::Year)
            .step_mode(StepMode::ToDate),
        SelectorButton::new()
            .count(1)
            .label("1y")
            .step(SelectorStep::Year)
            .step_mode(StepMode::Backward),
        SelectorButton::new().step(SelectorStep::All),
    ]
}

fn relayout_buttons(presets: &[RangePreset]) -> Vec<Button> {
    presets
        .iter()
        .map(|p| {
            let range = [p.start.format("%Y-%m-%d").to_string(), p.end.format("%Y-%m-%d").to_string()];
            Button::new()
                .label(p.label)
                .method(ButtonMethod::Relayout)
                .args(json!([{ "xaxis.range": range }]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> PreparedSeries {
        PreparedSeries {
            cutoff: d(2011, 7, 1),
            actual: vec![
                SeriesPoint::new(d(2010, 2, 5), 100.0),
                SeriesPoint::new(d(2011, 8, 5), 110.0),
                SeriesPoint::new(d(2012, 10, 26), 120.0),
            ],
            predicted: vec![SeriesPoint::new(d(2011, 8, 5), 95.0)],
        }
    }

    fn figure(series: &PreparedSeries) -> Value {
        let plot = build_plot(series, &ChartLabels::default());
        serde_json::from_str(&plot.to_json()).unwrap()
    }

    #[test]
    fn presets_look_back_from_last_date() {
        let presets = range_presets(d(2010, 2, 5), d(2012, 10, 26));
        let labels: Vec<_> = presets.iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["All", "Last Year", "Last 6 Months", "Last Month"]);

        assert_eq!(presets[0].start, d(2010, 2, 5));
        assert_eq!(presets[1].start, d(2011, 10, 27));
        assert_eq!(presets[2].start, d(2012, 4, 29));
        assert_eq!(presets[3].start, d(2012, 9, 26));
        assert!(presets.iter().all(|p| p.end == d(2012, 10, 26)));
    }

    #[test]
    fn traces_carry_series_values() {
        let fig = figure(&series());

        let actual = &fig["data"][0];
        assert_eq!(actual["name"], "Actual Sales");
        assert_eq!(actual["x"], json!(["2010-02-05", "2011-08-05", "2012-10-26"]));
        assert_eq!(actual["y"], json!([100.0, 110.0, 120.0]));
        assert_eq!(actual["line"]["color"], "blue");

        let predicted = &fig["data"][1];
        assert_eq!(predicted["name"], "Predicted Sales");
        assert_eq!(predicted["mode"], "lines+markers");
        assert_eq!(predicted["x"], json!(["2011-08-05"]));
        assert_eq!(predicted["line"]["color"], "red");
    }

    #[test]
    fn both_traces_share_hover_settings() {
        let fig = figure(&series());
        for trace in fig["data"].as_array().unwrap() {
            assert_eq!(trace["hoverinfo"], "x+y");
            assert_eq!(trace["hovertemplate"], HOVER_TEMPLATE);
        }
    }

    #[test]
    fn layout_has_slider_selector_and_legend() {
        let fig = figure(&series());
        let layout = &fig["layout"];

        assert_eq!(layout["title"]["text"], "Actual vs Predicted Weekly Sales (2010-2012)");
        assert_eq!(layout["xaxis"]["type"], "date");
        assert_eq!(layout["xaxis"]["rangeslider"]["visible"], true);
        assert_eq!(layout["xaxis"]["rangeselector"]["buttons"].as_array().unwrap().len(), 5);

        let legend = &layout["legend"];
        assert_eq!(legend["orientation"], "h");
        assert_eq!(legend["yanchor"], "bottom");
        assert_eq!(legend["y"], json!(1.02));
        assert_eq!(legend["xanchor"], "right");
        assert_eq!(legend["x"], json!(1.0));
    }

    #[test]
    fn relayout_menu_spans_full_range() {
        let fig = figure(&series());
        let menu = &fig["layout"]["updatemenus"][0];

        assert_eq!(menu["type"], "buttons");
        assert_eq!(menu["direction"], "right");
        assert_eq!(menu["active"], 0);
        assert_eq!(menu["x"], json!(0.1));
        assert_eq!(menu["y"], json!(1.2));

        let buttons = &menu["buttons"];
        assert_eq!(buttons[0]["method"], "relayout");
        assert_eq!(buttons[0]["args"][0]["xaxis.range"], json!(["2010-02-05", "2012-10-26"]));
        assert_eq!(buttons[3]["label"], "Last Month");
        assert_eq!(buttons[3]["args"][0]["xaxis.range"], json!(["2012-09-26", "2012-10-26"]));
    }

    #[test]
    fn empty_series_has_no_relayout_menu() {
        let empty = PreparedSeries {
            cutoff: d(2011, 7, 1),
            actual: vec![],
            predicted: vec![],
        };
        let fig = figure(&empty);
        assert!(fig["layout"].get("updatemenus").is_none());
    }
}
