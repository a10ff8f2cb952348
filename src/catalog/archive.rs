//! Internet Archive catalog client.
//!
//! Talks to three public endpoints:
//! - `advancedsearch.php` for paginated search
//! - `metadata/{identifier}` for item metadata and file listings
//! - `download/{identifier}/{file}` for file transfer
//!
//! Credentials are exchanged once for S3-style keys via the `xauthn` login
//! endpoint; later requests carry them in a `LOW access:secret` header.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::download::{flat_file_name, write_response_to_file};

use super::http_client::build_catalog_http_client;
use super::types::text_or_first;
use super::{Catalog, CatalogError, Collection, FileRecord, ItemMetadata, SearchRequest, SearchResult};

/// Default Internet Archive base URL.
pub const DEFAULT_BASE_URL: &str = "https://archive.org";

// ==================== API Response Types ====================

#[derive(Debug, Deserialize)]
struct AdvancedSearchResponse {
    response: AdvancedSearchDocs,
}

#[derive(Debug, Deserialize)]
struct AdvancedSearchDocs {
    #[serde(default)]
    docs: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    metadata: Option<RawItemMetadata>,
    #[serde(default)]
    files: Vec<FileRecord>,
}

#[derive(Debug, Deserialize)]
struct RawItemMetadata {
    #[serde(default, deserialize_with = "text_or_first")]
    title: String,
    collection: Option<Collection>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    values: Option<LoginValues>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginValues {
    s3: Option<S3Keys>,
}

#[derive(Debug, Deserialize)]
struct S3Keys {
    access: String,
    secret: String,
}

// ==================== ArchiveClient ====================

/// HTTP implementation of [`Catalog`] for the Internet Archive.
///
/// Create one instance at startup, optionally [`login`](Self::login), then
/// share it between workers behind an `Arc`.
pub struct ArchiveClient {
    client: Client,
    base_url: String,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    authenticated: bool,
}

impl ArchiveClient {
    /// Creates an unauthenticated client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if HTTP client construction fails.
    #[instrument(level = "debug", skip_all)]
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = build_catalog_http_client(connect_timeout_secs, read_timeout_secs, None)?;
        Ok(Self {
            client,
            base_url,
            connect_timeout_secs,
            read_timeout_secs,
            authenticated: false,
        })
    }

    /// Returns the catalog base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true once [`login`](Self::login) has succeeded.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Exchanges account credentials for API keys used on every later request.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AuthenticationFailure`] when the catalog rejects
    /// the credentials or the login endpoint cannot be used. The client stays
    /// usable without authentication in that case.
    #[instrument(skip(self, username, password), fields(base_url = %self.base_url))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), CatalogError> {
        let url = format!("{}/services/xauthn/?op=login", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("email", username), ("password", password)])
            .send()
            .await
            .map_err(|e| CatalogError::authentication(format!("login request failed: {e}")))?;

        let status = response.status();
        let body: LoginResponse = response.json().await.map_err(|e| {
            CatalogError::authentication(format!("unreadable login response (HTTP {status}): {e}"))
        })?;

        if !body.success {
            let reason = body
                .error
                .unwrap_or_else(|| format!("login rejected (HTTP {status})"));
            return Err(CatalogError::authentication(reason));
        }

        let keys = body
            .values
            .and_then(|values| values.s3)
            .ok_or_else(|| CatalogError::authentication("login response carried no API keys"))?;

        let authorization = format!("LOW {}:{}", keys.access, keys.secret);
        self.client = build_catalog_http_client(
            self.connect_timeout_secs,
            self.read_timeout_secs,
            Some(&authorization),
        )?;
        self.authenticated = true;
        debug!("catalog credentials accepted");
        Ok(())
    }

    fn download_url(&self, identifier: &str, file_name: &str) -> String {
        let encoded_name = file_name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/download/{}/{}",
            self.base_url,
            urlencoding::encode(identifier),
            encoded_name
        )
    }
}

impl std::fmt::Debug for ArchiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

/// Converts `-field` / `field` sort keys into the `field desc` / `field asc` form.
fn advanced_search_sort(sort: &str) -> String {
    match sort.strip_prefix('-') {
        Some(field) => format!("{field} desc"),
        None => format!("{sort} asc"),
    }
}

#[async_trait]
impl Catalog for ArchiveClient {
    #[instrument(skip(self, request), fields(page = request.page, rows = request.rows))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, CatalogError> {
        let url = format!("{}/advancedsearch.php", self.base_url);
        let mut params: Vec<(&str, String)> = vec![("q", request.query.clone())];
        params.extend(request.fields.iter().map(|field| ("fl[]", field.clone())));
        params.extend(
            request
                .sorts
                .iter()
                .map(|sort| ("sort[]", advanced_search_sort(sort))),
        );
        params.push(("rows", request.rows.to_string()));
        params.push(("page", request.page.to_string()));
        params.push(("output", "json".to_string()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CatalogError::unavailable("search", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::unavailable(
                "search",
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body: AdvancedSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::invalid_response("search", e))?;
        debug!(results = body.response.docs.len(), "search page received");
        Ok(body.response.docs)
    }

    #[instrument(skip(self))]
    async fn get_item(&self, identifier: &str) -> Result<ItemMetadata, CatalogError> {
        let url = format!(
            "{}/metadata/{}",
            self.base_url,
            urlencoding::encode(identifier)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::unavailable("metadata", e))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(CatalogError::item_not_found(identifier));
        }
        if !status.is_success() {
            return Err(CatalogError::unavailable(
                "metadata",
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let document: MetadataDocument = response
            .json()
            .await
            .map_err(|e| CatalogError::invalid_response("metadata", e))?;

        // The catalog answers unknown identifiers with an empty object.
        let Some(metadata) = document.metadata else {
            return Err(CatalogError::item_not_found(identifier));
        };

        Ok(ItemMetadata {
            identifier: identifier.to_string(),
            title: metadata.title,
            collection: metadata.collection,
            files: document.files,
        })
    }

    #[instrument(skip(self, item, formats), fields(identifier = %item.identifier, target_dir = %target_dir.display()))]
    async fn download_files(
        &self,
        item: &ItemMetadata,
        target_dir: &Path,
        formats: &[String],
    ) -> Result<Vec<PathBuf>, CatalogError> {
        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| CatalogError::from_fs(target_dir, e))?;

        let mut written = Vec::new();
        for file in item.files.iter().filter(|f| formats.contains(&f.format)) {
            let url = self.download_url(&item.identifier, &file.name);
            let file_path = target_dir.join(flat_file_name(&file.name));
            debug!(url = %url, path = %file_path.display(), "downloading file");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| CatalogError::transfer(&url, e))?;
            let bytes = write_response_to_file(response, &url, &file_path).await?;

            info!(path = %file_path.display(), bytes, "Downloaded file");
            written.push(file_path);
        }

        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_advanced_search_sort_conversion() {
        assert_eq!(advanced_search_sort("-week"), "week desc");
        assert_eq!(advanced_search_sort("title"), "title asc");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ArchiveClient::new("https://archive.org/", 10, 30).unwrap();
        assert_eq!(client.base_url(), "https://archive.org");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_download_url_encodes_segments() {
        let client = ArchiveClient::new("https://archive.org", 10, 30).unwrap();
        assert_eq!(
            client.download_url("moby dick", "scans/Moby Dick.pdf"),
            "https://archive.org/download/moby%20dick/scans/Moby%20Dick.pdf"
        );
    }

    #[test]
    fn test_metadata_document_empty_object_has_no_metadata() {
        let document: MetadataDocument = serde_json::from_str("{}").unwrap();
        assert!(document.metadata.is_none());
        assert!(document.files.is_empty());
    }

    #[test]
    fn test_debug_hides_client_internals() {
        let client = ArchiveClient::new("https://archive.org", 10, 30).unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("archive.org"));
        assert!(rendered.contains("authenticated: false"));
    }
}
