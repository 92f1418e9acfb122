//! Plotters-powered bond series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
// The `Color` trait (which provides `stroke_width`) is shadowed by
// `ratatui::style::Color` below, so bring it into scope anonymously.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only view of a bond series.
///
/// All coordinates are precomputed by the caller: x values are day offsets
/// from `base_date`, which keeps this widget free of any chart-description or
/// parsing concerns.
pub struct BondSeriesChart<'a> {
    /// The yield line, `(day offset, value)`, ascending by offset.
    pub line: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Date corresponding to `x = 0`; used to format tick labels.
    pub base_date: NaiveDate,
    /// Day offset of the "today" reference line, when it falls in range.
    pub today_x: Option<f64>,
    pub today_label: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl Widget for BondSeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        let base_date = self.base_date;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled to reduce clutter in
            // low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_date_offset(base_date, *v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let series_color = RGBColor(0, 255, 255); // cyan
            chart.draw_series(LineSeries::new(self.line.iter().copied(), &series_color))?;

            // Vertical dashed "today" reference line spanning the plot height,
            // with its label tucked just below the top edge.
            if let Some(today_x) = self.today_x {
                let marker_color = RGBColor(255, 0, 0); // red
                chart.draw_series(DashedLineSeries::new(
                    [(today_x, y0), (today_x, y1)].into_iter(),
                    2,
                    3,
                    marker_color.stroke_width(1),
                ))?;

                let label_y = y1 - (y1 - y0) * 0.05;
                chart.draw_series(std::iter::once(Text::new(
                    self.today_label.to_string(),
                    (today_x, label_y),
                    ("sans-serif", 10).into_font().color(&marker_color),
                )))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_date_offset(base: NaiveDate, offset: f64) -> String {
    let days = offset.round() as i64;
    match base.checked_add_signed(chrono::Duration::days(days)) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_map_offsets_back_to_dates() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(fmt_date_offset(base, 0.0), "2024-01-01");
        assert_eq!(fmt_date_offset(base, 31.0), "2024-02-01");
        assert_eq!(fmt_date_offset(base, 30.6), "2024-01-31");
    }
}
