//! Archivar Core Library
//!
//! This library provides the scrape engine behind the `archivar` tool, which
//! searches a remote catalog per topic and bulk-downloads eligible files into
//! a per-item directory tree.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Catalog boundary trait and the HTTP client implementing it
//! - [`download`] - Identifier sanitizing, format filtering, streaming transfer
//! - [`scrape`] - Item processor, topic workers, and the orchestrator
//! - [`config`] - TOML configuration with environment overrides
//! - [`logging`] - Facility-tagged log line format

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod download;
pub mod logging;
pub mod scrape;
mod user_agent;

// Re-export commonly used types
pub use catalog::{ArchiveClient, Catalog, CatalogError, ItemMetadata, SearchRequest, SearchResult};
pub use config::{Config, ConfigError};
pub use download::{FormatRules, sanitize_identifier, select_formats};
pub use scrape::{
    CatalogErrorPolicy, ItemProcessor, Outcome, ScrapeError, ScrapeOrchestrator, ScrapeSettings,
    TopicWorker, WorkerCompletion, WorkerReport,
};
