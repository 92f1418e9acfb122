//! Chart presentation: turning a [`BondSeries`] into a declarative chart
//! description, plus the local catalog filter.
//!
//! The description is render-agnostic: it carries series data, axis config,
//! the "today" reference line, and interaction flags, and is regenerated in
//! full on every successful load. Renderers (the TUI widget, or a JSON dump
//! for an external charting library) consume it read-only.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::domain::BondSeries;

pub const CHART_TITLE: &str = "Rentowność Obligacji Skarbowych RP";
pub const SERIES_NAME: &str = "Obligacje";
pub const TODAY_LABEL: &str = "Today";

/// Toolbar tools disabled in the interaction config. Everything else on the
/// default interaction surface stays enabled.
const REMOVED_MODE_BAR_BUTTONS: [&str; 3] = ["pan2d", "lasso2d", "select2d"];

#[derive(Debug, Clone, Serialize)]
pub struct ChartDescription {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: InteractionConfig,
}

/// One plotted series. Line-only rendering, no markers.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub hovermode: String,
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: String,
    pub autorange: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A vertical reference line. `yref = "paper"` makes `y0`/`y1` span the plot
/// height (0..1) independent of the data range.
#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub x0: String,
    pub x1: String,
    pub y0: f64,
    pub y1: f64,
    pub yref: String,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
    pub dash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub x: String,
    pub y: f64,
    pub yref: String,
    pub text: String,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionConfig {
    pub responsive: bool,
    #[serde(rename = "displayModeBar")]
    pub display_mode_bar: bool,
    #[serde(rename = "modeBarButtonsToRemove")]
    pub mode_bar_buttons_to_remove: Vec<String>,
    pub displaylogo: bool,
}

/// Assemble the chart description for a loaded series.
///
/// "Today" is the local calendar date at build time.
pub fn build_chart(series: &BondSeries) -> ChartDescription {
    build_chart_for_date(series, Local::now().date_naive())
}

/// Same as [`build_chart`] with an explicit "today", for deterministic tests.
pub fn build_chart_for_date(series: &BondSeries, today: NaiveDate) -> ChartDescription {
    let today = today.format("%Y-%m-%d").to_string();

    ChartDescription {
        data: vec![Trace {
            x: series.dates.clone(),
            y: series.values.clone(),
            kind: "scatter".to_string(),
            mode: "lines".to_string(),
            name: SERIES_NAME.to_string(),
        }],
        layout: Layout {
            hovermode: "x".to_string(),
            title: Title {
                text: CHART_TITLE.to_string(),
            },
            xaxis: Axis {
                title: "Date".to_string(),
                autorange: true,
                kind: Some("date".to_string()),
            },
            yaxis: Axis {
                title: "Value".to_string(),
                autorange: true,
                kind: None,
            },
            shapes: vec![Shape {
                kind: "line".to_string(),
                x0: today.clone(),
                x1: today.clone(),
                y0: 0.0,
                y1: 1.0,
                yref: "paper".to_string(),
                line: LineStyle {
                    color: "red".to_string(),
                    width: 2,
                    dash: "dash".to_string(),
                },
            }],
            annotations: vec![Annotation {
                x: today,
                y: 1.05,
                yref: "paper".to_string(),
                text: TODAY_LABEL.to_string(),
                showarrow: false,
                font: Font {
                    color: "red".to_string(),
                },
            }],
        },
        config: InteractionConfig {
            responsive: true,
            display_mode_bar: true,
            mode_bar_buttons_to_remove: REMOVED_MODE_BAR_BUTTONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            displaylogo: false,
        },
    }
}

/// Case-insensitive substring filter over the catalog.
///
/// A blank query returns the catalog unchanged; order is always preserved.
pub fn filter_catalog(query: &str, catalog: &[String]) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|bond| bond.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> BondSeries {
        BondSeries {
            dates: vec!["2024-06-01".to_string(), "2024-06-02".to_string()],
            values: vec![5.5, 5.75],
        }
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn today_marker_sits_at_the_given_date() {
        let chart = build_chart_for_date(&sample_series(), fixed_today());

        let shape = &chart.layout.shapes[0];
        assert_eq!(shape.x0, "2024-06-15");
        assert_eq!(shape.x1, "2024-06-15");
        assert_eq!(shape.yref, "paper");
        assert_eq!((shape.y0, shape.y1), (0.0, 1.0));
        assert_eq!(shape.line.dash, "dash");

        let annotation = &chart.layout.annotations[0];
        assert_eq!(annotation.x, "2024-06-15");
        assert_eq!(annotation.text, TODAY_LABEL);
        assert!(!annotation.showarrow);
    }

    #[test]
    fn trace_mirrors_the_series() {
        let series = sample_series();
        let chart = build_chart_for_date(&series, fixed_today());

        let trace = &chart.data[0];
        assert_eq!(trace.x, series.dates);
        assert_eq!(trace.y, series.values);
        assert_eq!(trace.mode, "lines");
        assert_eq!(trace.name, SERIES_NAME);
    }

    #[test]
    fn interaction_config_disables_the_three_tools_and_the_logo() {
        let chart = build_chart_for_date(&sample_series(), fixed_today());

        assert!(chart.config.responsive);
        assert!(chart.config.display_mode_bar);
        assert_eq!(
            chart.config.mode_bar_buttons_to_remove,
            vec!["pan2d", "lasso2d", "select2d"]
        );
        assert!(!chart.config.displaylogo);
    }

    #[test]
    fn description_serializes_with_renderer_facing_keys() {
        let chart = build_chart_for_date(&sample_series(), fixed_today());
        let doc = serde_json::to_value(&chart).unwrap();

        assert_eq!(doc["layout"]["shapes"][0]["x0"], "2024-06-15");
        assert_eq!(doc["layout"]["xaxis"]["type"], "date");
        assert_eq!(doc["config"]["displayModeBar"], true);
        assert_eq!(
            doc["config"]["modeBarButtonsToRemove"][1],
            "lasso2d"
        );
    }

    #[test]
    fn blank_query_returns_the_catalog_unchanged() {
        let catalog = vec!["EDO1034".to_string(), "COI0928".to_string()];
        assert_eq!(filter_catalog("", &catalog), catalog);
        assert_eq!(filter_catalog("   ", &catalog), catalog);
    }

    #[test]
    fn filter_is_a_case_insensitive_substring_match() {
        let catalog = vec!["Bond1".to_string(), "Bond2".to_string()];
        assert_eq!(filter_catalog("bond1", &catalog), vec!["Bond1"]);
        assert_eq!(filter_catalog("BOND", &catalog), catalog);
        assert!(filter_catalog("xyz", &catalog).is_empty());
    }
}
