//! Shared HTTP client construction for catalog traffic.
//!
//! Search, metadata, and file transfer requests all go through one pooled
//! client so timeouts, compression, and the User-Agent stay consistent.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};

use crate::user_agent;

use super::CatalogError;

/// Builds the catalog HTTP client.
///
/// `authorization` is attached as a default header to every request when present.
///
/// # Errors
///
/// Returns [`CatalogError::AuthenticationFailure`] when the authorization value
/// is not a valid header, and [`CatalogError::CatalogUnavailable`] when client
/// construction fails.
pub(crate) fn build_catalog_http_client(
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    authorization: Option<&str>,
) -> Result<Client, CatalogError> {
    let mut builder = base_client_builder(connect_timeout_secs, read_timeout_secs);
    if let Some(value) = authorization {
        let mut header = HeaderValue::from_str(value)
            .map_err(|e| CatalogError::authentication(format!("invalid credentials header: {e}")))?;
        header.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header);
        builder = builder.default_headers(headers);
    }
    builder
        .build()
        .map_err(|e| CatalogError::unavailable("client setup", e))
}

fn base_client_builder(connect_timeout_secs: u64, read_timeout_secs: u64) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}
