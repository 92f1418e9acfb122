//! Data-layer error taxonomy.
//!
//! Every loader converts its failures here, at the service boundary, so the
//! presentation layer only ever sees user-safe messages. Raw transport detail
//! is logged through `tracing` and never carried past this point for series
//! loads.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// `endpoint.json` could not be fetched or did not parse as JSON.
    /// Startup-fatal: without a base URL no data operation can run.
    #[error("Failed to fetch endpoint.json: {0}")]
    ConfigFetch(String),

    /// `endpoint.json` parsed but lacks a non-empty string `endpoint` value.
    #[error("endpoint.json is missing a valid 'endpoint' value")]
    ConfigMalformed,

    /// The bond list could not be loaded. Recoverable by reloading.
    #[error("Failed to load the bond list: {0}")]
    CatalogLoad(String),

    /// A bond series could not be loaded. The message is the fixed user-facing
    /// string; the underlying cause is only logged.
    #[error("Failed to load bond data. Please try again later.")]
    SeriesLoad,
}
