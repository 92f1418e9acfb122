//! Bond catalog loading.
//!
//! The catalog is a flat JSON array of bond identifiers. Source order is
//! preserved for display; there is no server-side filtering or pagination,
//! the client filters the full set locally.

use tracing::{debug, error};

use crate::data::{BondStore, DataError};

impl BondStore {
    /// Fetch the list of available bond identifiers.
    ///
    /// Failures carry the transport detail; user-facing messaging is the
    /// caller's responsibility. Single attempt, no retry.
    pub fn list_bonds(&self) -> Result<Vec<String>, DataError> {
        let url = self.catalog_url();

        let fetch = || -> Result<Vec<String>, reqwest::Error> {
            self.client
                .get(&url)
                .send()?
                .error_for_status()?
                .json::<Vec<String>>()
        };

        match fetch() {
            Ok(bonds) => {
                debug!(count = bonds.len(), "loaded bond list");
                Ok(bonds)
            }
            Err(e) => {
                error!(error = %e, %url, "bond list request failed");
                Err(DataError::CatalogLoad(e.to_string()))
            }
        }
    }
}
