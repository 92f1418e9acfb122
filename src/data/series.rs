//! Bond series loading and CSV parsing.
//!
//! A series is a two-column CSV (`date,value` from the API, `Date,Value` in
//! the asset bundle; header matching is case-insensitive so one parser covers
//! both). A row contributes a sample only when both fields are present and
//! non-empty; skipped rows never shift the alignment between dates and values.

use std::thread;
use std::time::{Duration, Instant};

use csv::StringRecord;
use tracing::{debug, error};

use crate::data::{BondStore, DataError};
use crate::domain::BondSeries;

/// Minimum wall-clock time between starting a series load and delivering a
/// successful result. Keeps the loading indicator visible instead of
/// flickering on fast networks; a fetch slower than this is delivered
/// immediately on completion.
pub const MIN_LOAD_DELAY: Duration = Duration::from_millis(500);

impl BondStore {
    /// Fetch and parse the series for `bond_id`.
    ///
    /// Any failure in the fetch/parse path is logged with its original detail
    /// and re-signalled as the fixed user-facing [`DataError::SeriesLoad`].
    /// Single attempt, no retry.
    pub fn load_series(&self, bond_id: &str) -> Result<BondSeries, DataError> {
        let started = Instant::now();
        let url = self.series_url(bond_id);

        let fetched = self
            .fetch_csv(&url)
            .and_then(|text| parse_bond_csv(&text).map_err(|e| e.to_string()));

        match fetched {
            Ok(series) => {
                debug!(bond = bond_id, rows = series.len(), "parsed bond series");
                Ok(hold_until_floor(started, series))
            }
            Err(detail) => {
                error!(error = %detail, bond = bond_id, %url, "bond data request failed");
                Err(DataError::SeriesLoad)
            }
        }
    }

    fn fetch_csv(&self, url: &str) -> Result<String, String> {
        let fetch = || -> Result<String, reqwest::Error> {
            self.client.get(url).send()?.error_for_status()?.text()
        };
        fetch().map_err(|e| e.to_string())
    }
}

/// Parse a CSV payload into a [`BondSeries`].
///
/// Rows missing either field are silently skipped. The value cell goes
/// through standard float parsing and is kept even when it does not parse
/// (it collapses to NaN); no numeric validation is performed.
pub fn parse_bond_csv(text: &str) -> Result<BondSeries, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, "date");
    let value_idx = find_column(&headers, "value");

    // A payload without the expected columns has no extractable rows.
    let (Some(date_idx), Some(value_idx)) = (date_idx, value_idx) else {
        return Ok(BondSeries::default());
    };

    let mut series = BondSeries::default();
    for record in reader.records() {
        let record = record?;
        let date = record.get(date_idx).filter(|s| !s.is_empty());
        let value = record.get(value_idx).filter(|s| !s.is_empty());
        let (Some(date), Some(value)) = (date, value) else {
            continue;
        };
        series.dates.push(date.to_string());
        series.values.push(value.parse::<f64>().unwrap_or(f64::NAN));
    }

    Ok(series)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

/// Sleep out whatever remains of [`MIN_LOAD_DELAY`], then return `value`.
fn hold_until_floor<T>(started: Instant, value: T) -> T {
    if let Some(remaining) = MIN_LOAD_DELAY.checked_sub(started.elapsed()) {
        thread::sleep(remaining);
    }
    value
}
