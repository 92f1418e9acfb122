//! Runtime endpoint discovery.
//!
//! The API-backed deployment publishes its base URL in a small JSON file at
//! the serving root (`endpoint.json`). Resolution happens exactly once, before
//! any bond-data call, and there is no retry: a broken config file means the
//! session cannot start.

use reqwest::blocking::Client;
use reqwest::header;
use tracing::{debug, error};

use crate::data::{DataError, join_url};

const ENDPOINT_FILE: &str = "endpoint.json";

/// Fetch `endpoint.json` from the serving root and return the trimmed base URL.
///
/// The request is sent with `Cache-Control: no-store`; a redeployed config
/// must take effect on the next session, not when a cache expires.
pub fn resolve(client: &Client, root_url: &str) -> Result<String, DataError> {
    let url = join_url(root_url, ENDPOINT_FILE);

    let response = client
        .get(&url)
        .header(header::CACHE_CONTROL, "no-store")
        .send()
        .map_err(|e| {
            error!(error = %e, %url, "endpoint.json request failed");
            DataError::ConfigFetch(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        error!(%status, %url, "endpoint.json returned a non-success status");
        return Err(DataError::ConfigFetch(format!("status {status}")));
    }

    let body = response
        .text()
        .map_err(|e| DataError::ConfigFetch(e.to_string()))?;

    let endpoint = endpoint_from_json(&body)?;
    debug!(endpoint = %endpoint, "resolved API endpoint");
    Ok(endpoint)
}

/// Extract the `endpoint` value from the config payload.
///
/// Anything other than a non-empty (post-trim) string at the expected key is
/// treated as a malformed config.
fn endpoint_from_json(body: &str) -> Result<String, DataError> {
    let doc: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| DataError::ConfigFetch(format!("invalid JSON: {e}")))?;

    let value = doc
        .get("endpoint")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or("");

    if value.is_empty() {
        return Err(DataError::ConfigMalformed);
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_trims_endpoint() {
        let body = r#"{"endpoint": "  https://api.example.com  "}"#;
        assert_eq!(
            endpoint_from_json(body).unwrap(),
            "https://api.example.com"
        );
    }

    #[test]
    fn missing_key_is_malformed() {
        let err = endpoint_from_json(r#"{"other": "x"}"#).unwrap_err();
        assert!(matches!(err, DataError::ConfigMalformed));
    }

    #[test]
    fn blank_value_is_malformed() {
        let err = endpoint_from_json(r#"{"endpoint": "   "}"#).unwrap_err();
        assert!(matches!(err, DataError::ConfigMalformed));
    }

    #[test]
    fn non_string_value_is_malformed() {
        let err = endpoint_from_json(r#"{"endpoint": 42}"#).unwrap_err();
        assert!(matches!(err, DataError::ConfigMalformed));
    }

    #[test]
    fn invalid_json_is_a_fetch_error() {
        let err = endpoint_from_json("not json").unwrap_err();
        assert!(matches!(err, DataError::ConfigFetch(_)));
    }
}
