//! Shared load pipeline used by the plain-terminal front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! endpoint resolution -> catalog -> series -> chart description
//!
//! The TUI runs the same steps incrementally (through [`connect`] and the
//! store's loaders) so it can stay responsive between them.

use crate::chart::{ChartDescription, build_chart};
use crate::data::BondStore;
use crate::domain::{BondSeries, RunConfig};
use crate::error::AppError;

/// All computed outputs of a single load.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub catalog: Vec<String>,
    pub bond: String,
    pub series: BondSeries,
    pub chart: ChartDescription,
}

/// Build the store for the configured source.
///
/// For the API variant this runs the one-shot endpoint resolution gate; every
/// data call afterwards uses the resolved base URL.
pub fn connect(config: &RunConfig) -> Result<BondStore, AppError> {
    Ok(BondStore::connect(config)?)
}

/// Load one bond end-to-end: catalog, series, chart description.
///
/// With `bond = None` the first catalog entry is used, mirroring the UI's
/// auto-selection after a catalog load.
pub fn load_bond(store: &BondStore, bond: Option<&str>) -> Result<RunOutput, AppError> {
    let catalog = store.list_bonds()?;

    let bond = match bond {
        Some(bond) => bond.to_string(),
        None => catalog
            .first()
            .cloned()
            .ok_or_else(|| AppError::new(4, "No bonds available."))?,
    };

    let series = store.load_series(&bond)?;
    let chart = build_chart(&series);

    Ok(RunOutput {
        catalog,
        bond,
        series,
        chart,
    })
}
