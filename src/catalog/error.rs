//! Error types for catalog operations.
//!
//! Every boundary call to the remote catalog maps its failure into one of
//! these variants so the item processor can decide between fallback,
//! isolation, and propagation without inspecting transport details.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`Catalog`](super::Catalog) implementations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Credentials were rejected or the login endpoint could not be used.
    #[error("authentication failed: {reason}")]
    AuthenticationFailure {
        /// Why the login attempt failed.
        reason: String,
    },

    /// The catalog could not be reached or answered with a server error.
    #[error("catalog unavailable during {operation}: {reason}")]
    CatalogUnavailable {
        /// The catalog operation that failed (search, metadata, ...).
        operation: &'static str,
        /// Human-readable failure description.
        reason: String,
    },

    /// The requested item does not exist in the catalog.
    #[error("item not found: {identifier}")]
    ItemNotFound {
        /// The identifier that was looked up.
        identifier: String,
    },

    /// The destination path cannot hold the downloaded files.
    #[error("path conflict at {path}: {source}")]
    PathConflict {
        /// The directory or file path that could not be used.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },

    /// An HTTP-level failure occurred while transferring a file.
    #[error("transfer failed for {url}: {reason}")]
    TransferError {
        /// The file URL being transferred.
        url: String,
        /// HTTP status code, when the failure was a status response.
        status: Option<u16>,
        /// Human-readable failure description.
        reason: String,
    },

    /// The catalog answered with a payload that could not be interpreted.
    #[error("invalid catalog response during {operation}: {reason}")]
    InvalidResponse {
        /// The catalog operation whose response was malformed.
        operation: &'static str,
        /// What was wrong with the payload.
        reason: String,
    },

    /// Local filesystem error unrelated to path structure.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Creates an authentication failure.
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::AuthenticationFailure {
            reason: reason.into(),
        }
    }

    /// Creates a catalog-unavailable error for the given operation.
    pub fn unavailable(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::CatalogUnavailable {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Creates an item-not-found error.
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::ItemNotFound {
            identifier: identifier.into(),
        }
    }

    /// Creates a path conflict error.
    pub fn path_conflict(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathConflict {
            path: path.into(),
            source,
        }
    }

    /// Creates a transfer error from an HTTP status response.
    pub fn transfer_status(url: impl Into<String>, status: u16) -> Self {
        Self::TransferError {
            url: url.into(),
            status: Some(status),
            reason: format!("HTTP {status}"),
        }
    }

    /// Creates a transfer error from a transport failure.
    pub fn transfer(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::TransferError {
            url: url.into(),
            status: None,
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidResponse {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Classifies a filesystem error raised while preparing or writing `path`.
    ///
    /// Errors caused by the shape of the path (a component that is a file, a
    /// directory where a file is expected, an unusable name) become
    /// [`CatalogError::PathConflict`]; everything else stays [`CatalogError::Io`].
    pub fn from_fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let path = path.into();
        match source.kind() {
            ErrorKind::NotADirectory
            | ErrorKind::IsADirectory
            | ErrorKind::AlreadyExists
            | ErrorKind::InvalidInput => Self::PathConflict { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Returns true for errors the item processor recovers from with a fallback directory.
    #[must_use]
    pub fn is_path_conflict(&self) -> bool {
        matches!(self, Self::PathConflict { .. })
    }

    /// Returns true for HTTP-level transfer failures.
    #[must_use]
    pub fn is_transfer_error(&self) -> bool {
        matches!(self, Self::TransferError { .. })
    }
}
