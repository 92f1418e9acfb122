//! Ratatui-based terminal UI.
//!
//! The TUI shows a searchable bond list next to the yield chart. Loads run on
//! worker threads and report back over a channel, so the event loop never
//! blocks on the network and a superseded response can be discarded by the
//! session state machine.

use std::io;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::chart::ChartDescription;
use crate::data::{BondStore, DataError};
use crate::domain::{BondSeries, RunConfig, SourceKind};
use crate::error::AppError;

mod plotters_chart;
mod state;

use plotters_chart::BondSeriesChart;
use state::{LoadRequest, Phase, Session};

/// Start the TUI.
pub fn run(config: &RunConfig) -> Result<(), AppError> {
    // Endpoint resolution is a one-shot gate: it must finish before the first
    // data call, and a failure here should print cleanly, not inside the
    // alternate screen.
    let store = crate::app::pipeline::connect(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(store);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// A completed load, reported by a worker thread.
enum LoadResult {
    Catalog(Result<Vec<String>, DataError>),
    Series {
        seq: u64,
        result: Result<BondSeries, DataError>,
    },
}

struct App {
    store: BondStore,
    session: Session,
    filter_editing: bool,
    status: String,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl App {
    fn new(store: BondStore) -> Self {
        let (tx, rx) = channel();
        let mut app = Self {
            store,
            session: Session::new(),
            filter_editing: false,
            status: "Loading bond list...".to_string(),
            tx,
            rx,
        };
        let request = app.session.request_catalog();
        app.spawn(request);
        app
    }

    /// Run one load on a worker thread.
    ///
    /// The store clone shares the HTTP client; the 500 ms delivery floor for
    /// series loads sleeps on the worker, never here. When the TUI shuts down
    /// the receiver is dropped and a worker's send simply discards the result.
    fn spawn(&self, request: LoadRequest) {
        let store = self.store.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = match request {
                LoadRequest::Catalog => LoadResult::Catalog(store.list_bonds()),
                LoadRequest::Series { seq, bond } => LoadResult::Series {
                    seq,
                    result: store.load_series(&bond),
                },
            };
            let _ = tx.send(result);
        });
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            while let Ok(result) = self.rx.try_recv() {
                self.on_load_result(result);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn on_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Catalog(result) => {
                let followup = self.session.catalog_loaded(result);
                self.status = match self.session.phase {
                    Phase::Error => "Bond list load failed.".to_string(),
                    _ => format!("{} bond(s) available.", self.session.catalog.len()),
                };
                if let Some(request) = followup {
                    self.spawn(request);
                }
            }
            LoadResult::Series { seq, result } => {
                self.session.series_loaded(seq, result);
                if self.session.phase == Phase::SeriesReady {
                    if let Some(bond) = &self.session.selected {
                        self.status = format!("Loaded {bond}.");
                    }
                }
            }
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.filter_editing {
            self.handle_filter_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                self.filter_editing = true;
                self.status = "Filtering (type to narrow, Enter/Esc to close).".to_string();
            }
            KeyCode::Up => self.session.move_cursor(-1),
            KeyCode::Down => self.session.move_cursor(1),
            KeyCode::Enter => {
                if let Some(request) = self.session.activate_cursor() {
                    self.announce_series(&request);
                    self.spawn(request);
                }
            }
            KeyCode::Char('r') => {
                if let Some(request) = self.session.reload_series() {
                    self.announce_series(&request);
                    self.spawn(request);
                }
            }
            KeyCode::Char('R') => {
                if self.session.phase != Phase::LoadingCatalog {
                    let request = self.session.request_catalog();
                    self.status = "Reloading bond list...".to_string();
                    self.spawn(request);
                }
            }
            _ => {}
        }

        false
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.filter_editing = false;
            }
            KeyCode::Backspace => {
                let mut filter = self.session.filter.clone();
                filter.pop();
                self.session.set_filter(filter);
            }
            KeyCode::Char(c) => {
                let mut filter = self.session.filter.clone();
                filter.push(c);
                self.session.set_filter(filter);
            }
            _ => {}
        }
    }

    fn announce_series(&mut self, request: &LoadRequest) {
        if let LoadRequest::Series { bond, .. } = request {
            self.status = format!("Loading {bond}...");
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let source = match self.store.source() {
            SourceKind::Api => "api",
            SourceKind::Assets => "assets",
        };
        let selected = self.session.selected.as_deref().unwrap_or("-");
        let samples = self
            .session
            .chart
            .as_ref()
            .and_then(|c| c.data.first())
            .map(|t| t.x.len())
            .unwrap_or(0);

        let lines = vec![
            Line::from(vec![
                Span::styled("obv", Style::default().fg(Color::Cyan)),
                Span::raw(" — Obligacje Skarbowe"),
            ]),
            Line::from(Span::styled(
                format!(
                    "source: {source} | bonds: {} | bond: {selected} | samples: {samples} | state: {:?}",
                    self.session.catalog.len(),
                    self.session.phase,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(0)])
            .split(area);

        self.draw_bond_list(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_bond_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = if self.session.filter.is_empty() {
            "Bonds".to_string()
        } else {
            format!("Bonds [{}]", self.session.filter)
        };

        let items: Vec<ListItem> = self
            .session
            .filtered
            .iter()
            .map(|bond| ListItem::new(bond.clone()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut list_state = ratatui::widgets::ListState::default();
        if !self.session.filtered.is_empty() {
            list_state.select(Some(self.session.cursor));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(crate::chart::CHART_TITLE)
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.session.loading {
            let msg = Paragraph::new("Loading bond data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let Some(chart) = &self.session.chart else {
            let msg = Paragraph::new("No data loaded.").style(Style::default().fg(Color::Gray));
            frame.render_widget(msg, inner);
            return;
        };

        let Some(view) = ChartView::from_description(chart) else {
            let msg = Paragraph::new("No plottable samples in this series.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = BondSeriesChart {
            line: &view.line,
            x_bounds: view.x_bounds,
            y_bounds: view.y_bounds,
            base_date: view.base_date,
            today_x: view.today_x,
            today_label: crate::chart::TODAY_LABEL,
            x_label: "Date",
            y_label: "Value",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter load  / filter  r reload  R reload list  q quit";
        let (status, style) = match &self.session.error {
            Some(error) => (error.as_str(), Style::default().fg(Color::Red)),
            None => (self.status.as_str(), Style::default().fg(Color::Yellow)),
        };

        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(status, style),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Plot-ready coordinates derived from a chart description.
///
/// Dates become day offsets from the first plottable sample; rows whose date
/// does not parse or whose value is NaN are left out of the rendered line
/// (they still exist in the description itself).
struct ChartView {
    line: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    base_date: NaiveDate,
    today_x: Option<f64>,
}

impl ChartView {
    fn from_description(chart: &ChartDescription) -> Option<Self> {
        let trace = chart.data.first()?;

        let mut dated: Vec<(NaiveDate, f64)> = Vec::with_capacity(trace.x.len());
        for (date, &value) in trace.x.iter().zip(&trace.y) {
            let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
                continue;
            };
            if value.is_finite() {
                dated.push((date, value));
            }
        }

        let base_date = dated.first()?.0;
        let line: Vec<(f64, f64)> = dated
            .iter()
            .map(|&(date, value)| (day_offset(base_date, date), value))
            .collect();

        let today_x = chart
            .layout
            .shapes
            .first()
            .and_then(|s| NaiveDate::parse_from_str(&s.x0, "%Y-%m-%d").ok())
            .map(|date| day_offset(base_date, date));

        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &(x, y) in &line {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        // Keep the today marker visible even when it lies past the data.
        if let Some(today_x) = today_x {
            x_min = x_min.min(today_x);
            x_max = x_max.max(today_x);
        }
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }

        if !(y_min.is_finite() && y_max.is_finite()) {
            y_min = 0.0;
            y_max = 1.0;
        }
        let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

        Some(Self {
            line,
            x_bounds: [x_min, x_max],
            y_bounds: [y_min - pad, y_max + pad],
            base_date,
            today_x,
        })
    }
}

fn day_offset(base: NaiveDate, date: NaiveDate) -> f64 {
    (date - base).num_days() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_chart_for_date;

    fn series() -> BondSeries {
        BondSeries {
            dates: vec![
                "2024-06-01".to_string(),
                "2024-06-02".to_string(),
                "2024-06-04".to_string(),
            ],
            values: vec![5.0, f64::NAN, 6.0],
        }
    }

    #[test]
    fn view_maps_dates_to_day_offsets_and_drops_nan_samples() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let chart = build_chart_for_date(&series(), today);
        let view = ChartView::from_description(&chart).unwrap();

        assert_eq!(view.line, vec![(0.0, 5.0), (3.0, 6.0)]);
        assert_eq!(view.base_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        // Today lies past the last sample and stretches the x range.
        assert_eq!(view.today_x, Some(14.0));
        assert_eq!(view.x_bounds, [0.0, 14.0]);
    }

    #[test]
    fn view_is_none_when_nothing_is_plottable() {
        let empty = BondSeries::default();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let chart = build_chart_for_date(&empty, today);
        assert!(ChartView::from_description(&chart).is_none());
    }
}
