//! Catalog client adapter.
//!
//! The scrape engine talks to the remote catalog only through the
//! [`Catalog`] trait, which exposes the three boundary operations the
//! pipeline needs:
//!
//! - [`Catalog::search`] - one page of search results
//! - [`Catalog::get_item`] - item metadata and file listing
//! - [`Catalog::download_files`] - flat transfer of selected files
//!
//! [`ArchiveClient`] implements the trait over HTTP against the Internet
//! Archive endpoints. Tests substitute in-memory implementations.
//!
//! # Example
//!
//! ```no_run
//! use archivar_core::catalog::{ArchiveClient, Catalog, SearchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArchiveClient::new("https://archive.org", 30, 300)?;
//! let request = SearchRequest::titles_by_week("title:(Subject)", 50, 1);
//! for result in client.search(&request).await? {
//!     println!("{} [{}]", result.title, result.identifier);
//! }
//! # Ok(())
//! # }
//! ```

mod archive;
mod error;
mod http_client;
mod query;
mod types;

pub use archive::{ArchiveClient, DEFAULT_BASE_URL};
pub use error::CatalogError;
pub use query::{SearchQuery, field_query, title_query};
pub use types::{
    Collection, FileRecord, ItemMetadata, SORT_WEEK_DESCENDING, SearchRequest, SearchResult,
};

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Boundary to the remote catalog.
///
/// # Object Safety
///
/// Uses `async_trait` so workers can share one client as `Arc<dyn Catalog>`.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches one page of search results.
    ///
    /// An empty page is a valid answer; callers do not treat it as the end
    /// of pagination.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, CatalogError>;

    /// Fetches metadata and the file listing for one item.
    async fn get_item(&self, identifier: &str) -> Result<ItemMetadata, CatalogError>;

    /// Downloads every file of `item` whose format label is in `formats`,
    /// flat into `target_dir`, and returns the written paths.
    ///
    /// Fails with [`CatalogError::PathConflict`] when `target_dir` cannot hold
    /// the files and with [`CatalogError::TransferError`] on HTTP failures.
    async fn download_files(
        &self,
        item: &ItemMetadata,
        target_dir: &Path,
        formats: &[String],
    ) -> Result<Vec<PathBuf>, CatalogError>;
}
