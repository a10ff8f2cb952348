//! Integration tests for the scrape engine.
//!
//! Workers run against a scripted in-memory catalog and write into a
//! temporary directory tree.

mod support;

use std::sync::Arc;

use archivar_core::catalog::Catalog;
use archivar_core::download::FormatRules;
use archivar_core::scrape::{
    CatalogErrorPolicy, ItemProcessor, PAGE_SIZE, ScrapeOrchestrator, ScrapeSettings, TopicWorker,
};
use support::scripted_catalog::ScriptedCatalog;
use tempfile::TempDir;

fn settings(prefix: &std::path::Path) -> ScrapeSettings {
    ScrapeSettings {
        directory_prefix: prefix.to_path_buf(),
        essential_query: "mediatype:(texts) AND -collection:(inlibrary)".to_string(),
        languages: vec!["English".to_string()],
        rules: FormatRules::new(&[".pdf".to_string()], 35.0),
        on_catalog_error: CatalogErrorPolicy::Skip,
    }
}

#[tokio::test]
async fn test_single_worker_searches_pages_one_through_ten() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let catalog = Arc::new(ScriptedCatalog::default().with_topic("Subject", 3));
    let shared: Arc<dyn Catalog> = catalog.clone();
    let processor = ItemProcessor::new(
        Arc::clone(&shared),
        temp.path().to_path_buf(),
        FormatRules::new(&[".pdf".to_string()], 35.0),
    );
    let worker = TopicWorker::new(shared, processor, CatalogErrorPolicy::Skip, "Subject");

    let report = worker
        .run("title:(Subject)", 0, false)
        .await
        .expect("worker should finish");

    let searches = catalog.searches();
    assert_eq!(searches.len(), 10);
    assert_eq!(catalog.pages_for("Subject"), (1..=10).collect::<Vec<_>>());
    assert!(searches.iter().all(|request| request.rows == PAGE_SIZE));

    // Pages 4..=10 are empty but still requested.
    assert_eq!(report.runs_completed, 10);
    assert_eq!(report.downloaded, 3);
    assert!(temp.path().join("Subject_Page_2").join("Subject-p2.pdf").is_file());
}

#[tokio::test]
async fn test_two_topics_run_concurrently_and_isolate_transfer_failures() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let catalog = Arc::new(
        ScriptedCatalog::default()
            .with_topic("Alpha", 10)
            .with_topic("Beta", 10)
            .fail_download("Alpha-p3"),
    );
    let shared: Arc<dyn Catalog> = catalog.clone();
    let orchestrator = ScrapeOrchestrator::new(shared, settings(temp.path()));

    let topics = vec!["Alpha".to_string(), "Beta".to_string()];
    let completions = orchestrator.run(&topics, false).await;

    assert_eq!(catalog.searches().len(), 20);
    assert_eq!(catalog.pages_for("Alpha"), (1..=10).collect::<Vec<_>>());
    assert_eq!(catalog.pages_for("Beta"), (1..=10).collect::<Vec<_>>());

    assert_eq!(completions.len(), 2);
    let alpha = completions[0].result.as_ref().expect("Alpha worker finished");
    let beta = completions[1].result.as_ref().expect("Beta worker finished");
    assert_eq!(completions[0].topic, "Alpha");
    assert_eq!(alpha.failed, 1);
    assert_eq!(alpha.downloaded, 9);
    assert_eq!(beta.downloaded, 10);
    assert_eq!(beta.failed, 0);

    // Run 4 of Alpha still happened after the failure in run 3.
    assert!(temp.path().join("Alpha_Page_4").join("Alpha-p4.pdf").is_file());
    assert!(!temp.path().join("Alpha_Page_3").join("Alpha-p3.pdf").exists());
    assert!(catalog.downloads().contains(&"Alpha-p4".to_string()));
    for page in 1..=10 {
        let dir = temp.path().join(format!("Beta_Page_{page}"));
        assert!(dir.join(format!("Beta-p{page}.pdf")).is_file(), "missing {dir:?}");
    }
}

#[tokio::test]
async fn test_rerun_skips_everything_already_scraped() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let catalog = Arc::new(ScriptedCatalog::default().with_topic("Gamma", 2));
    let shared: Arc<dyn Catalog> = catalog.clone();
    let orchestrator = ScrapeOrchestrator::new(shared, settings(temp.path()));
    let topics = vec!["Gamma".to_string()];

    let first = orchestrator.run(&topics, false).await;
    let second = orchestrator.run(&topics, false).await;

    let first = first[0].result.as_ref().expect("first run finished");
    let second = second[0].result.as_ref().expect("second run finished");
    assert_eq!(first.downloaded, 2);
    assert_eq!(second.downloaded, 0);
    assert_eq!(second.already_scraped, 2);
    assert_eq!(catalog.downloads().len(), 2);
}

#[tokio::test]
async fn test_dry_run_creates_no_directories() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let prefix = temp.path().join("books");
    let catalog = Arc::new(ScriptedCatalog::default().with_topic("Delta", 5));
    let shared: Arc<dyn Catalog> = catalog.clone();
    let orchestrator = ScrapeOrchestrator::new(shared, settings(&prefix));

    let completions = orchestrator.run(&["Delta".to_string()], true).await;

    let report = completions[0].result.as_ref().expect("dry run finished");
    assert_eq!(report.results_seen, 5);
    assert_eq!(report.downloaded, 0);
    assert!(catalog.downloads().is_empty());
    assert!(!prefix.exists());
}
