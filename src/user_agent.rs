//! User-Agent string for catalog HTTP traffic.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/archivar";

/// Default User-Agent for search, metadata, and download requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("archivar/{version} (catalog-scraper; +{PROJECT_UA_URL})")
}
