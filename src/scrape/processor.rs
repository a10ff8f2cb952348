//! Per-item pipeline: metadata, skip checks, format selection, transfer.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{Catalog, CatalogError, ItemMetadata, SearchResult};
use crate::download::{FormatRules, sanitize_identifier, select_formats};

use super::ScrapeError;

/// Why an item was skipped without downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target directory already exists.
    AlreadyScraped,
    /// No file passed the format filter.
    NoMatchingFiles,
}

/// Why an item ended without files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// An HTTP-level transfer failure.
    TransferError(String),
    /// Both the title directory and the identifier fallback were unusable.
    PathConflict(String),
}

/// Result of processing one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Files were written into `target_dir`.
    Downloaded {
        /// Directory the files landed in.
        target_dir: PathBuf,
        /// Paths of the written files.
        files: Vec<PathBuf>,
    },
    /// Nothing was downloaded on purpose.
    Skipped(SkipReason),
    /// The transfer was attempted and failed.
    Failed(FailureReason),
}

/// Runs the per-item pipeline against a shared catalog.
pub struct ItemProcessor {
    catalog: Arc<dyn Catalog>,
    directory_prefix: PathBuf,
    rules: FormatRules,
}

impl ItemProcessor {
    /// Creates a processor writing under `directory_prefix`.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, directory_prefix: PathBuf, rules: FormatRules) -> Self {
        Self {
            catalog,
            directory_prefix,
            rules,
        }
    }

    /// Processes one search result.
    ///
    /// Existing target directories and items without eligible files are
    /// skipped. A path conflict gets exactly one retry into
    /// `<prefix>/<identifier>`; transfer failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] for metadata failures and unexpected
    /// filesystem errors. Conflicts and transfer failures are reported as
    /// [`Outcome::Failed`] instead.
    #[instrument(skip(self, result), fields(identifier = %result.identifier))]
    pub async fn process(&self, result: &SearchResult) -> Result<Outcome, ScrapeError> {
        info!(title = %result.title, identifier = %result.identifier, "Found");

        let item = self.catalog.get_item(&result.identifier).await?;
        let safe_title = sanitize_identifier(&item.title, "_");
        debug!(collections = %item.collections_path(), "item collections");

        let target_dir = self.directory_prefix.join(&safe_title);
        if path_exists(&target_dir).await? {
            info!(target_dir = %target_dir.display(), "Book already scraped; continuing");
            return Ok(Outcome::Skipped(SkipReason::AlreadyScraped));
        }

        let formats = select_formats(&item.files, &self.rules);
        if formats.is_empty() {
            info!(identifier = %item.identifier, "No files found");
            return Ok(Outcome::Skipped(SkipReason::NoMatchingFiles));
        }

        info!(target_dir = %target_dir.display(), formats = ?formats, "Now downloading");
        match self.download_into(&item, &target_dir, &formats).await {
            Ok(files) => Ok(Outcome::Downloaded { target_dir, files }),
            Err(e) if e.is_path_conflict() => {
                let fallback_dir = self.directory_prefix.join(&item.identifier);
                warn!(
                    error = %e,
                    fallback_dir = %fallback_dir.display(),
                    "Target directory unusable; retrying under identifier"
                );
                match self.download_into(&item, &fallback_dir, &formats).await {
                    Ok(files) => Ok(Outcome::Downloaded {
                        target_dir: fallback_dir,
                        files,
                    }),
                    Err(e) => failed(e),
                }
            }
            Err(e) => failed(e),
        }
    }

    async fn download_into(
        &self,
        item: &ItemMetadata,
        target_dir: &Path,
        formats: &[String],
    ) -> Result<Vec<PathBuf>, CatalogError> {
        tokio::fs::create_dir_all(target_dir)
            .await
            .map_err(|e| CatalogError::from_fs(target_dir, e))?;
        self.catalog
            .download_files(item, target_dir, formats)
            .await
    }
}

/// Maps a terminal download error to a failed outcome, propagating anything unexpected.
fn failed(e: CatalogError) -> Result<Outcome, ScrapeError> {
    let reason = if e.is_path_conflict() {
        FailureReason::PathConflict(e.to_string())
    } else if e.is_transfer_error() {
        FailureReason::TransferError(e.to_string())
    } else {
        return Err(e.into());
    };
    error!(error = %e, "Download failed");
    Ok(Outcome::Failed(reason))
}

/// Like `Path::exists`, but surfaces permission errors instead of hiding them.
async fn path_exists(path: &Path) -> Result<bool, ScrapeError> {
    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(ScrapeError::io(path, e)),
    }
}
