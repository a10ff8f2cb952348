//! Fan-out of one topic worker per topic, then join.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::catalog::{Catalog, SearchQuery, title_query};

use super::processor::ItemProcessor;
use super::worker::{TopicWorker, WorkerReport};
use super::{ScrapeError, ScrapeSettings};

/// Final state of one topic worker.
#[derive(Debug)]
pub struct WorkerCompletion {
    /// Worker index, equal to the topic's position.
    pub index: usize,
    /// Topic the worker scraped.
    pub topic: String,
    /// Report, worker error, or panic.
    pub result: Result<WorkerReport, ScrapeError>,
}

/// Starts every topic worker concurrently and waits for all of them.
pub struct ScrapeOrchestrator {
    catalog: Arc<dyn Catalog>,
    settings: Arc<ScrapeSettings>,
}

impl ScrapeOrchestrator {
    /// Creates an orchestrator sharing `catalog` with every worker.
    #[must_use]
    pub fn new(catalog: Arc<dyn Catalog>, settings: ScrapeSettings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
        }
    }

    /// Builds the full search query for `topic`.
    #[must_use]
    pub fn build_query(&self, topic: &str) -> String {
        SearchQuery::new(
            title_query(topic),
            self.settings.essential_query.as_str(),
            &self.settings.languages,
        )
        .to_string()
    }

    /// Runs one worker per topic and returns a completion per topic, in topic order.
    ///
    /// A failing or panicking worker never cancels the others.
    pub async fn run(&self, topics: &[String], dry_run: bool) -> Vec<WorkerCompletion> {
        let mut handles = Vec::with_capacity(topics.len());

        for (index, topic) in topics.iter().enumerate() {
            info!(worker = index, topic = %topic, "Searching title");
            let query = self.build_query(topic);
            info!(worker = index, query = %query, "Searching query");

            let processor = ItemProcessor::new(
                Arc::clone(&self.catalog),
                self.settings.directory_prefix.clone(),
                self.settings.rules.clone(),
            );
            let worker = TopicWorker::new(
                Arc::clone(&self.catalog),
                processor,
                self.settings.on_catalog_error,
                topic.as_str(),
            );

            let handle = tokio::spawn(async move { worker.run(&query, index, dry_run).await });
            handles.push((index, topic.clone(), handle));
        }

        info!(workers = handles.len(), "all workers started");

        let mut completions = Vec::with_capacity(handles.len());
        for (index, topic, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_error) => {
                    error!(worker = index, error = %join_error, "worker task panicked");
                    Err(ScrapeError::WorkerPanicked {
                        index,
                        topic: topic.clone(),
                        reason: join_error.to_string(),
                    })
                }
            };
            completions.push(WorkerCompletion {
                index,
                topic,
                result,
            });
        }

        completions
    }
}

/// Logs one summary line per worker.
pub fn log_completion_summary(completions: &[WorkerCompletion]) {
    for completion in completions {
        match &completion.result {
            Ok(report) => info!(
                worker = completion.index,
                topic = %completion.topic,
                runs = report.runs_completed,
                results = report.results_seen,
                downloaded = report.downloaded,
                already_scraped = report.already_scraped,
                no_matching_files = report.no_matching_files,
                failed = report.failed,
                errors_skipped = report.errors_skipped,
                "Worker finished"
            ),
            Err(e) => warn!(
                worker = completion.index,
                topic = %completion.topic,
                error = %e,
                "Worker stopped"
            ),
        }
    }
}
