//! Per-file download eligibility: extension match plus size ceiling.

use tracing::info;

use crate::catalog::FileRecord;

/// Bytes per binary megabyte.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Which files qualify for download.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRules {
    extensions: Vec<String>,
    max_filesize_mb: f64,
}

impl FormatRules {
    /// Creates rules from accepted extensions (e.g. `.pdf`) and an inclusive size ceiling in MB.
    ///
    /// Extensions are compared case-insensitively.
    #[must_use]
    pub fn new(extensions: &[String], max_filesize_mb: f64) -> Self {
        Self {
            extensions: extensions.iter().map(|ext| ext.to_lowercase()).collect(),
            max_filesize_mb,
        }
    }

    /// Accepted extensions, lower-cased.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Inclusive size ceiling in MB.
    #[must_use]
    pub fn max_filesize_mb(&self) -> f64 {
        self.max_filesize_mb
    }
}

/// Converts a byte count to binary megabytes rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

/// Returns the format labels of every file that qualifies for download.
///
/// Files without a reported size are ignored. A file is checked against each
/// accepted extension independently, so a name matching two extensions is
/// recorded twice.
#[must_use]
pub fn select_formats(files: &[FileRecord], rules: &FormatRules) -> Vec<String> {
    let mut selected = Vec::new();

    for file in files {
        let Some(bytes) = file.size else {
            continue;
        };
        let size_mb = size_in_mb(bytes);
        let lower_name = file.name.to_lowercase();

        for extension in &rules.extensions {
            if !lower_name.ends_with(extension.as_str()) {
                continue;
            }
            if size_mb <= rules.max_filesize_mb {
                info!(format = %file.format, size_mb, "Found file");
                selected.push(file.format.clone());
            } else {
                info!(
                    format = %file.format,
                    size_mb,
                    max_filesize_mb = rules.max_filesize_mb,
                    "Found file over size limit; continuing"
                );
            }
        }
    }

    selected
}
