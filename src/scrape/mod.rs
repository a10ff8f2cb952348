//! Concurrent scrape engine.
//!
//! # Architecture
//!
//! - [`ScrapeOrchestrator`] builds one query per topic and spawns a
//!   [`TopicWorker`] task for each
//! - [`TopicWorker`] performs ten sequential search runs (pages 1..=10)
//! - [`ItemProcessor`] handles one search result: metadata, skip checks,
//!   format selection, download with a single fallback directory
//!
//! Workers share only the catalog client, the settings, and the filesystem.

mod error;
mod orchestrator;
mod processor;
mod worker;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing;

use std::path::PathBuf;

pub use error::{CatalogErrorPolicy, ScrapeError};
pub use orchestrator::{ScrapeOrchestrator, WorkerCompletion, log_completion_summary};
pub use processor::{FailureReason, ItemProcessor, Outcome, SkipReason};
pub use worker::{PAGE_SIZE, RUNS_PER_WORKER, TopicWorker, WorkerReport};

use crate::config::Config;
use crate::download::FormatRules;

/// Read-only settings shared by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeSettings {
    /// Root directory for per-item sub-directories.
    pub directory_prefix: PathBuf,
    /// Clause appended to every topic query.
    pub essential_query: String,
    /// Accepted languages.
    pub languages: Vec<String>,
    /// File eligibility rules.
    pub rules: FormatRules,
    /// Error handling policy for workers.
    pub on_catalog_error: CatalogErrorPolicy,
}

impl ScrapeSettings {
    /// Extracts the engine settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            directory_prefix: config.directory_prefix.clone(),
            essential_query: config.essential_query.clone(),
            languages: config.languages.clone(),
            rules: FormatRules::new(&config.formats, config.max_filesize_mb),
            on_catalog_error: config.on_catalog_error,
        }
    }
}
