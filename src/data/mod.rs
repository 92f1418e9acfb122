//! Data access: endpoint resolution, bond catalog, and series loading.
//!
//! All network calls go through a single [`BondStore`], constructed once per
//! session. For the API-backed source the store is only built after the
//! endpoint resolution gate has completed, so no bond-data call can ever run
//! against an unresolved base URL.

use reqwest::blocking::Client;

use crate::domain::{RunConfig, SourceKind};

pub mod catalog;
pub mod endpoint;
pub mod error;
pub mod series;

pub use error::DataError;

/// Handle to the configured bond-data backend.
///
/// Cheap to clone (the inner HTTP client is reference-counted), which lets
/// loads run on worker threads while the UI thread keeps its own copy.
#[derive(Clone)]
pub struct BondStore {
    client: Client,
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Api { base: String },
    Assets { root: String },
}

impl BondStore {
    /// Connect to the configured source.
    ///
    /// For [`SourceKind::Api`] this resolves `endpoint.json` first; a failed
    /// resolution is fatal and no data call is attempted.
    pub fn connect(config: &RunConfig) -> Result<Self, DataError> {
        let client = Client::new();
        let backend = match config.source {
            SourceKind::Api => Backend::Api {
                base: endpoint::resolve(&client, &config.root_url)?,
            },
            SourceKind::Assets => Backend::Assets {
                root: config.root_url.clone(),
            },
        };
        Ok(Self { client, backend })
    }

    pub fn source(&self) -> SourceKind {
        match self.backend {
            Backend::Api { .. } => SourceKind::Api,
            Backend::Assets { .. } => SourceKind::Assets,
        }
    }

    fn catalog_url(&self) -> String {
        match &self.backend {
            Backend::Api { base } => join_url(base, "bonds"),
            Backend::Assets { root } => join_url(root, "assets/files.json"),
        }
    }

    fn series_url(&self, bond_id: &str) -> String {
        match &self.backend {
            Backend::Api { base } => join_url(base, &format!("bonds/{bond_id}/csv")),
            Backend::Assets { root } => join_url(root, &format!("assets/{bond_id}.csv")),
        }
    }
}

/// Join a base URL and a relative path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_store(base: &str) -> BondStore {
        BondStore {
            client: Client::new(),
            backend: Backend::Api {
                base: base.to_string(),
            },
        }
    }

    fn asset_store(root: &str) -> BondStore {
        BondStore {
            client: Client::new(),
            backend: Backend::Assets {
                root: root.to_string(),
            },
        }
    }

    #[test]
    fn api_urls() {
        let store = api_store("https://api.example.com/");
        assert_eq!(store.catalog_url(), "https://api.example.com/bonds");
        assert_eq!(
            store.series_url("EDO1034"),
            "https://api.example.com/bonds/EDO1034/csv"
        );
    }

    #[test]
    fn asset_urls() {
        let store = asset_store("https://bonds.example.com");
        assert_eq!(
            store.catalog_url(),
            "https://bonds.example.com/assets/files.json"
        );
        assert_eq!(
            store.series_url("EDO1034"),
            "https://bonds.example.com/assets/EDO1034.csv"
        );
    }

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(join_url("http://x/", "endpoint.json"), "http://x/endpoint.json");
        assert_eq!(join_url("http://x", "endpoint.json"), "http://x/endpoint.json");
    }
}
