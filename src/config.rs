//! Run configuration: TOML file, environment overrides, validation.
//!
//! The configuration is loaded once at startup and shared read-only with
//! every worker. A missing config file yields the built-in defaults.
//!
//! ```toml
//! directory_prefix = "books"
//! max_filesize_mb = 35
//! formats = [".pdf"]
//! languages = ["English"]
//! topics = ["Subject", "History"]
//! on_catalog_error = "skip"
//!
//! [credentials]
//! username = "me@example.com"
//! password = "secret"
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::DEFAULT_BASE_URL;
use crate::scrape::CatalogErrorPolicy;

/// Environment variable overriding the catalog username.
pub const USERNAME_ENV: &str = "ARCHIVAR_IA_USERNAME";
/// Environment variable overriding the catalog password.
pub const PASSWORD_ENV: &str = "ARCHIVAR_IA_PASSWORD";

const DEFAULT_DIRECTORY_PREFIX: &str = "books";
const DEFAULT_ESSENTIAL_QUERY: &str = "mediatype:(texts) AND -collection:(inlibrary)";
const DEFAULT_MAX_FILESIZE_MB: f64 = 35.0;
const DEFAULT_LOG_FACILITY: &str = "Archivar";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Catalog account credentials. Empty username means anonymous access.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Credentials {
    /// Account e-mail.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Returns true when a username is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client timeouts for catalog traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (covers file transfers).
    pub read_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Process-wide scrape configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog credentials.
    pub credentials: Credentials,
    /// Catalog base URL.
    pub catalog_base_url: String,
    /// Root directory holding one sub-directory per downloaded item.
    pub directory_prefix: PathBuf,
    /// Clause appended to every topic query.
    pub essential_query: String,
    /// Inclusive per-file size ceiling in binary megabytes.
    pub max_filesize_mb: f64,
    /// Accepted file name extensions, e.g. `.pdf`.
    pub formats: Vec<String>,
    /// Accepted catalog languages, OR-joined into the query.
    pub languages: Vec<String>,
    /// Search topics; each gets its own worker.
    pub topics: Vec<String>,
    /// What a worker does when a catalog call fails outside the handled cases.
    pub on_catalog_error: CatalogErrorPolicy,
    /// Facility tag printed at the start of every log line.
    pub log_facility: String,
    /// HTTP timeouts.
    pub http: HttpSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            catalog_base_url: DEFAULT_BASE_URL.to_string(),
            directory_prefix: PathBuf::from(DEFAULT_DIRECTORY_PREFIX),
            essential_query: DEFAULT_ESSENTIAL_QUERY.to_string(),
            max_filesize_mb: DEFAULT_MAX_FILESIZE_MB,
            formats: vec![".pdf".to_string()],
            languages: vec!["English".to_string()],
            topics: vec!["Subject".to_string()],
            on_catalog_error: CatalogErrorPolicy::default(),
            log_facility: DEFAULT_LOG_FACILITY.to_string(),
            http: HttpSettings::default(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Loads the config file at the default location, or the defaults when it does not exist.
    ///
    /// Returns the path that was read, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an existing file cannot be read or parsed.
    pub fn load_default() -> Result<(Self, Option<PathBuf>), ConfigError> {
        match resolve_default_config_path() {
            Some(path) if path.exists() => Ok((Self::load(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }

    /// Replaces credentials with values from [`USERNAME_ENV`] / [`PASSWORD_ENV`] when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(username) = env_var_non_empty(USERNAME_ENV) {
            self.credentials.username = username;
        }
        if let Some(password) = env_var_non_empty(PASSWORD_ENV) {
            self.credentials.password = password;
        }
    }

    /// Validates values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_filesize_mb.is_finite() || self.max_filesize_mb <= 0.0 {
            return Err(ConfigError::invalid(
                "max_filesize_mb",
                format!("{} (expected a positive number)", self.max_filesize_mb),
            ));
        }
        if self.formats.iter().all(|format| format.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "formats",
                "at least one file extension is required",
            ));
        }
        if self.topics.iter().all(|topic| topic.trim().is_empty()) {
            return Err(ConfigError::invalid("topics", "at least one topic is required"));
        }
        match url::Url::parse(&self.catalog_base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::invalid(
                    "catalog_base_url",
                    format!("unsupported scheme `{}`", parsed.scheme()),
                ));
            }
            Err(e) => {
                return Err(ConfigError::invalid(
                    "catalog_base_url",
                    format!("{} ({e})", self.catalog_base_url),
                ));
            }
        }
        validate_timeout_secs("http.connect_timeout_secs", self.http.connect_timeout_secs)?;
        validate_timeout_secs("http.read_timeout_secs", self.http.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if !(1..=3600).contains(&value) {
        return Err(ConfigError::invalid(
            field,
            format!("{value} (expected range: 1..=3600)"),
        ));
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/archivar/config.toml`
/// 2. `$HOME/.config/archivar/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("archivar")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("archivar")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn env_var_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
