//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the data-source selection enum (`SourceKind`)
//! - the parsed bond time series (`BondSeries`)
//! - the resolved run configuration (`RunConfig`)

pub mod types;

pub use types::*;
