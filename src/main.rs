//! CLI entry point for the archivar scraper.

use std::sync::Arc;

use anyhow::{Context, Result};
use archivar_core::config::Config;
use archivar_core::logging;
use archivar_core::scrape::{ScrapeOrchestrator, ScrapeSettings, log_completion_summary};
use archivar_core::{ArchiveClient, Catalog};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let (mut config, config_path) = match &args.config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            (config, Some(path.clone()))
        }
        None => Config::load_default().context("failed to load default config")?,
    };
    config.apply_env_overrides();
    args.apply_to(&mut config);
    config.validate().context("invalid configuration")?;

    logging::init(&config.log_facility, args.verbose, args.quiet);

    debug!(?args, "CLI arguments parsed");
    match &config_path {
        Some(path) => debug!(path = %path.display(), "config loaded"),
        None => debug!("no config file found; using defaults"),
    }

    let mut client = ArchiveClient::new(
        config.catalog_base_url.as_str(),
        config.http.connect_timeout_secs,
        config.http.read_timeout_secs,
    )
    .context("failed to build catalog client")?;

    if config.credentials.is_configured() {
        match client
            .login(&config.credentials.username, &config.credentials.password)
            .await
        {
            Ok(()) => info!("Logged in"),
            Err(e) => error!(error = %e, "Login failed; continuing unauthenticated"),
        }
    }

    let topics: Vec<String> = config
        .topics
        .iter()
        .map(|topic| topic.trim())
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect();

    let catalog: Arc<dyn Catalog> = Arc::new(client);
    let orchestrator = ScrapeOrchestrator::new(catalog, ScrapeSettings::from_config(&config));
    let completions = orchestrator.run(&topics, args.dry_run).await;

    log_completion_summary(&completions);
    let stopped = completions.iter().filter(|c| c.result.is_err()).count();
    info!(workers = completions.len(), stopped, "Scrape complete");

    Ok(())
}
