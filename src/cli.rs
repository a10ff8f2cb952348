//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use archivar_core::config::Config;
use archivar_core::scrape::CatalogErrorPolicy;
use clap::Parser;

/// Scrape catalog search results per topic and bulk-download matching files.
///
/// Archivar runs one concurrent worker per topic. Each worker walks ten pages
/// of search results and downloads every eligible file into
/// `<directory_prefix>/<title>/`.
#[derive(Parser, Debug)]
#[command(name = "archivar")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/archivar/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log search results without fetching metadata or downloading
    #[arg(long)]
    pub dry_run: bool,

    /// Topic to scrape; repeat for several workers (replaces configured topics)
    #[arg(short, long = "topic", value_name = "TOPIC")]
    pub topics: Vec<String>,

    /// Directory receiving one sub-directory per item (overrides directory_prefix)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Stop a worker on its first unhandled catalog error instead of skipping
    #[arg(long)]
    pub fail_worker: bool,
}

impl Args {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if !self.topics.is_empty() {
            config.topics.clone_from(&self.topics);
        }
        if let Some(output_dir) = &self.output_dir {
            config.directory_prefix.clone_from(output_dir);
        }
        if self.fail_worker {
            config.on_catalog_error = CatalogErrorPolicy::FailWorker;
        }
    }
}
