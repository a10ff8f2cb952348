//! One topic worker: ten sequential search runs, items processed in order.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::catalog::{Catalog, SearchRequest, SearchResult};

use super::processor::{FailureReason, ItemProcessor, Outcome, SkipReason};
use super::{CatalogErrorPolicy, ScrapeError};

/// Search runs per worker. Each run requests the next page.
pub const RUNS_PER_WORKER: u32 = 10;

/// Results requested per search page.
pub const PAGE_SIZE: u32 = 50;

/// Per-worker outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Runs whose search succeeded.
    pub runs_completed: u32,
    /// Search results received across all runs.
    pub results_seen: usize,
    /// Items downloaded.
    pub downloaded: usize,
    /// Items skipped because their directory already existed.
    pub already_scraped: usize,
    /// Items skipped because no file qualified.
    pub no_matching_files: usize,
    /// Items whose transfer failed.
    pub failed: usize,
    /// Errors logged and skipped under [`CatalogErrorPolicy::Skip`].
    pub errors_skipped: usize,
}

impl WorkerReport {
    /// Adds one item outcome to the counts.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Downloaded { .. } => self.downloaded += 1,
            Outcome::Skipped(SkipReason::AlreadyScraped) => self.already_scraped += 1,
            Outcome::Skipped(SkipReason::NoMatchingFiles) => self.no_matching_files += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Drives the runs for a single topic.
pub struct TopicWorker {
    catalog: Arc<dyn Catalog>,
    processor: ItemProcessor,
    policy: CatalogErrorPolicy,
    topic: String,
}

impl TopicWorker {
    /// Creates a worker for `topic`.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn Catalog>,
        processor: ItemProcessor,
        policy: CatalogErrorPolicy,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            processor,
            policy,
            topic: topic.into(),
        }
    }

    /// Runs exactly [`RUNS_PER_WORKER`] searches, pages 1 through 10.
    ///
    /// Short or empty pages do not end the loop. In dry-run mode results are
    /// only logged.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScrapeError`] when the policy is
    /// [`CatalogErrorPolicy::FailWorker`]. Under [`CatalogErrorPolicy::Skip`]
    /// errors are logged and counted instead.
    #[instrument(skip(self, query), fields(worker = index, topic = %self.topic))]
    pub async fn run(
        &self,
        query: &str,
        index: usize,
        dry_run: bool,
    ) -> Result<WorkerReport, ScrapeError> {
        let mut report = WorkerReport::default();
        info!(worker = index, topic = %self.topic, "Started scraping");

        for run in 0..RUNS_PER_WORKER {
            info!(worker = index, run, "Starting run");
            let request = SearchRequest::titles_by_week(query, PAGE_SIZE, run + 1);

            let results = match self.catalog.search(&request).await {
                Ok(results) => results,
                Err(e) => {
                    self.handle_error(index, e.into(), &mut report)?;
                    continue;
                }
            };
            report.results_seen += results.len();

            if dry_run {
                log_dry_run(index, &results);
            } else {
                for result in &results {
                    match self.processor.process(result).await {
                        Ok(outcome) => {
                            log_outcome(index, result, &outcome);
                            report.record(&outcome);
                        }
                        Err(e) => self.handle_error(index, e, &mut report)?,
                    }
                }
            }

            report.runs_completed += 1;
            info!(worker = index, run, "Run complete");
        }

        Ok(report)
    }

    fn handle_error(
        &self,
        index: usize,
        e: ScrapeError,
        report: &mut WorkerReport,
    ) -> Result<(), ScrapeError> {
        match self.policy {
            CatalogErrorPolicy::Skip => {
                error!(worker = index, error = %e, "Catalog error; continuing");
                report.errors_skipped += 1;
                Ok(())
            }
            CatalogErrorPolicy::FailWorker => {
                error!(worker = index, error = %e, "Catalog error; stopping worker");
                Err(e)
            }
        }
    }
}

fn log_dry_run(index: usize, results: &[SearchResult]) {
    for result in results {
        info!(
            worker = index,
            title = %result.title,
            identifier = %result.identifier,
            "Dry run result"
        );
    }
}

fn log_outcome(index: usize, result: &SearchResult, outcome: &Outcome) {
    match outcome {
        Outcome::Downloaded { target_dir, files } => info!(
            worker = index,
            identifier = %result.identifier,
            target_dir = %target_dir.display(),
            files = files.len(),
            "Item downloaded"
        ),
        Outcome::Skipped(reason) => info!(
            worker = index,
            identifier = %result.identifier,
            reason = ?reason,
            "Item skipped"
        ),
        Outcome::Failed(FailureReason::TransferError(message) | FailureReason::PathConflict(message)) => {
            warn!(
                worker = index,
                identifier = %result.identifier,
                error = %message,
                "Item failed"
            );
        }
    }
}
