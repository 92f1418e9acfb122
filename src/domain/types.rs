//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the loaders and the presentation layer
//! - dumped as JSON from the CLI
//! - reused by alternate front-ends

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which backing store serves the bond catalog and series data.
///
/// The two variants mirror the two deployment shapes of the upstream data:
/// a small API discovered at runtime, or a pre-rendered static asset bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Resolve the API base URL from `endpoint.json`, then call `{base}/bonds`.
    Api,
    /// Read `assets/files.json` and `assets/{bond}.csv` from the serving root.
    Assets,
}

/// A bond yield time series parsed from a CSV payload.
///
/// Invariant: `dates` and `values` are index-aligned and always the same
/// length. Both empty is valid (a payload with no data rows).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondSeries {
    /// ISO dates (`YYYY-MM-DD`), kept verbatim from the payload, ascending.
    pub dates: Vec<String>,
    /// Yield values; an unparseable cell collapses to the NaN sentinel.
    pub values: Vec<f64>,
}

impl BondSeries {
    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Resolved run configuration (CLI flags plus environment).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Serving root URL: where `endpoint.json` and the asset bundle live.
    pub root_url: String,
    pub source: SourceKind,
}
