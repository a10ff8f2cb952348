//! Error types for the scrape engine.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors surfaced by the item processor and topic workers.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A catalog call failed in a way the item processor does not handle itself.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Local filesystem failure outside a catalog transfer.
    #[error("filesystem error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A worker task panicked before reporting.
    #[error("worker {index} ({topic}) panicked: {reason}")]
    WorkerPanicked {
        /// Worker index.
        index: usize,
        /// Topic the worker was scraping.
        topic: String,
        /// Panic description from the runtime.
        reason: String,
    },
}

impl ScrapeError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// What a worker does with a [`ScrapeError`] raised while processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogErrorPolicy {
    /// Log the error and move on to the next item, or the next run when the search failed.
    #[default]
    Skip,
    /// Stop the worker and report the error in its completion.
    FailWorker,
}

impl std::fmt::Display for CatalogErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::FailWorker => write!(f, "fail-worker"),
        }
    }
}
