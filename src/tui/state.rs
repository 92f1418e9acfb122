//! Session state machine for the TUI.
//!
//! Kept free of any terminal/rendering types so the transitions (and the
//! stale-response discipline) are unit-testable. The event loop feeds it
//! completed load results; it hands back the follow-up requests to spawn.
//!
//! Phases: Idle -> LoadingCatalog -> CatalogReady -> LoadingSeries ->
//! SeriesReady, with Error reachable from either loading phase.

use crate::chart::{ChartDescription, build_chart, filter_catalog};
use crate::data::DataError;
use crate::domain::BondSeries;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingCatalog,
    CatalogReady,
    LoadingSeries,
    SeriesReady,
    Error,
}

/// A load the event loop should hand to a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Catalog,
    Series { seq: u64, bond: String },
}

pub struct Session {
    pub phase: Phase,
    pub catalog: Vec<String>,
    /// Catalog view after applying `filter`; what the selection list shows.
    pub filtered: Vec<String>,
    pub filter: String,
    /// Cursor position within `filtered`.
    pub cursor: usize,
    pub selected: Option<String>,
    pub chart: Option<ChartDescription>,
    pub error: Option<String>,
    pub loading: bool,
    /// Current series request. A completion carrying any other value is a
    /// superseded request and is discarded wholesale.
    seq: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            catalog: Vec::new(),
            filtered: Vec::new(),
            filter: String::new(),
            cursor: 0,
            selected: None,
            chart: None,
            error: None,
            loading: false,
            seq: 0,
        }
    }

    /// Start (or restart) a catalog load. Invalidates any in-flight series
    /// request, since its result would refer to a superseded catalog.
    pub fn request_catalog(&mut self) -> LoadRequest {
        self.seq += 1;
        self.phase = Phase::LoadingCatalog;
        self.loading = true;
        self.error = None;
        LoadRequest::Catalog
    }

    /// Apply a completed catalog load.
    ///
    /// On success the first identifier is auto-selected and its series load
    /// is requested immediately; an empty catalog stays in `CatalogReady`.
    pub fn catalog_loaded(
        &mut self,
        result: Result<Vec<String>, DataError>,
    ) -> Option<LoadRequest> {
        self.loading = false;
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                self.filtered = filter_catalog(&self.filter, &self.catalog);
                self.cursor = 0;
                self.phase = Phase::CatalogReady;
                let first = self.catalog.first().cloned()?;
                Some(self.request_series(first))
            }
            Err(err) => {
                self.fail(err.to_string());
                None
            }
        }
    }

    /// User changed the selected bond.
    ///
    /// Allowed while a series is loading (the new request supersedes the old
    /// one) and from `Error` (re-selecting is the recovery path). Not before
    /// the catalog exists.
    pub fn select(&mut self, bond: String) -> Option<LoadRequest> {
        match self.phase {
            Phase::CatalogReady | Phase::SeriesReady | Phase::LoadingSeries | Phase::Error => {
                Some(self.request_series(bond))
            }
            Phase::Idle | Phase::LoadingCatalog => None,
        }
    }

    /// Select whatever the cursor points at in the filtered view.
    pub fn activate_cursor(&mut self) -> Option<LoadRequest> {
        let bond = self.filtered.get(self.cursor)?.clone();
        self.select(bond)
    }

    /// Re-request the currently selected bond's series.
    pub fn reload_series(&mut self) -> Option<LoadRequest> {
        let bond = self.selected.clone()?;
        self.select(bond)
    }

    /// Apply a completed series load. Stale completions (any `seq` other than
    /// the current request's) are ignored so a slow response can never
    /// overwrite a newer selection.
    pub fn series_loaded(&mut self, seq: u64, result: Result<BondSeries, DataError>) {
        if seq != self.seq {
            return;
        }
        self.loading = false;
        match result {
            Ok(series) => {
                self.chart = Some(build_chart(&series));
                self.phase = Phase::SeriesReady;
                self.error = None;
            }
            // The previous chart stays on screen; only the error banner changes.
            Err(err) => self.fail(err.to_string()),
        }
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        self.filtered = filter_catalog(&self.filter, &self.catalog);
        if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len().saturating_sub(1);
        }
    }

    pub fn move_cursor(&mut self, delta: i64) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.filtered.len() - 1;
        self.cursor = if delta < 0 {
            self.cursor.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.cursor + delta as usize).min(last)
        };
    }

    fn request_series(&mut self, bond: String) -> LoadRequest {
        self.seq += 1;
        self.selected = Some(bond.clone());
        self.phase = Phase::LoadingSeries;
        self.loading = true;
        self.error = None;
        LoadRequest::Series {
            seq: self.seq,
            bond,
        }
    }

    fn fail(&mut self, message: String) {
        self.phase = Phase::Error;
        self.error = Some(message);
        self.loading = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        vec!["EDO1034".to_string(), "COI0928".to_string()]
    }

    fn series(value: f64) -> BondSeries {
        BondSeries {
            dates: vec!["2024-01-02".to_string()],
            values: vec![value],
        }
    }

    fn chart_value(session: &Session) -> f64 {
        session.chart.as_ref().unwrap().data[0].y[0]
    }

    #[test]
    fn catalog_success_auto_selects_the_first_bond() {
        let mut session = Session::new();
        assert_eq!(session.request_catalog(), LoadRequest::Catalog);
        assert_eq!(session.phase, Phase::LoadingCatalog);
        assert!(session.loading);

        let request = session.catalog_loaded(Ok(catalog())).unwrap();
        assert_eq!(
            request,
            LoadRequest::Series {
                seq: 2,
                bond: "EDO1034".to_string()
            }
        );
        assert_eq!(session.phase, Phase::LoadingSeries);
        assert_eq!(session.selected.as_deref(), Some("EDO1034"));
        assert_eq!(session.filtered, catalog());
    }

    #[test]
    fn empty_catalog_stays_ready_with_no_selection() {
        let mut session = Session::new();
        session.request_catalog();
        assert!(session.catalog_loaded(Ok(Vec::new())).is_none());
        assert_eq!(session.phase, Phase::CatalogReady);
        assert!(session.selected.is_none());
        assert!(!session.loading);
    }

    #[test]
    fn catalog_failure_enters_error_with_the_message() {
        let mut session = Session::new();
        session.request_catalog();
        let result = session.catalog_loaded(Err(DataError::CatalogLoad("boom".to_string())));
        assert!(result.is_none());
        assert_eq!(session.phase, Phase::Error);
        assert_eq!(
            session.error.as_deref(),
            Some("Failed to load the bond list: boom")
        );
        assert!(!session.loading);
    }

    #[test]
    fn stale_series_response_is_discarded() {
        let mut session = Session::new();
        session.request_catalog();
        let first = session.catalog_loaded(Ok(catalog())).unwrap();
        let LoadRequest::Series { seq: seq_a, .. } = first else {
            panic!("expected a series request");
        };

        // User switches to the second bond while the first load is pending.
        let second = session.select("COI0928".to_string()).unwrap();
        let LoadRequest::Series { seq: seq_b, .. } = second else {
            panic!("expected a series request");
        };
        assert!(seq_b > seq_a);

        // A's (slow) response arrives after B was requested: ignored.
        session.series_loaded(seq_a, Ok(series(1.0)));
        assert_eq!(session.phase, Phase::LoadingSeries);
        assert!(session.chart.is_none());

        // B's response wins.
        session.series_loaded(seq_b, Ok(series(2.0)));
        assert_eq!(session.phase, Phase::SeriesReady);
        assert_eq!(chart_value(&session), 2.0);
        assert!(!session.loading);
    }

    #[test]
    fn series_failure_keeps_the_previous_chart() {
        let mut session = Session::new();
        session.request_catalog();
        let LoadRequest::Series { seq, .. } = session.catalog_loaded(Ok(catalog())).unwrap()
        else {
            panic!("expected a series request");
        };
        session.series_loaded(seq, Ok(series(1.0)));
        assert_eq!(session.phase, Phase::SeriesReady);

        let LoadRequest::Series { seq, .. } = session.reload_series().unwrap() else {
            panic!("expected a series request");
        };
        session.series_loaded(seq, Err(DataError::SeriesLoad));

        assert_eq!(session.phase, Phase::Error);
        assert_eq!(
            session.error.as_deref(),
            Some("Failed to load bond data. Please try again later.")
        );
        assert_eq!(chart_value(&session), 1.0);
    }

    #[test]
    fn selection_is_rejected_before_the_catalog_exists() {
        let mut session = Session::new();
        assert!(session.select("EDO1034".to_string()).is_none());
        session.request_catalog();
        assert!(session.select("EDO1034".to_string()).is_none());
    }

    #[test]
    fn filter_narrows_the_view_and_clamps_the_cursor() {
        let mut session = Session::new();
        session.request_catalog();
        session.catalog_loaded(Ok(catalog()));

        session.cursor = 1;
        session.set_filter("edo");
        assert_eq!(session.filtered, vec!["EDO1034".to_string()]);
        assert_eq!(session.cursor, 0);

        session.set_filter("");
        assert_eq!(session.filtered, catalog());
    }

    #[test]
    fn catalog_reload_invalidates_a_pending_series_request() {
        let mut session = Session::new();
        session.request_catalog();
        let LoadRequest::Series { seq, .. } = session.catalog_loaded(Ok(catalog())).unwrap()
        else {
            panic!("expected a series request");
        };

        session.request_catalog();
        session.series_loaded(seq, Ok(series(1.0)));
        assert!(session.chart.is_none());
        assert_eq!(session.phase, Phase::LoadingCatalog);
    }
}
