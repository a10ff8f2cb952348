//! Path segment sanitization for target directories and downloaded files.

use std::path::{Component, Path};

/// Maximum length of a sanitized identifier, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 255;

/// Normalizes arbitrary catalog text into a single safe path segment.
///
/// Steps, in order: trim surrounding whitespace; replace spaces with
/// `space_replacement`; strip `:` `.` `,` `'` `"`; truncate to
/// [`MAX_IDENTIFIER_LEN`] characters; drop every character outside
/// `[A-Za-z0-9-_]`.
///
/// The result may be empty when the input held no usable characters. An
/// empty segment joins to the parent directory itself.
///
/// ```
/// use archivar_core::download::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Moby Dick: A Novel.", "_"), "Moby_Dick_A_Novel");
/// ```
#[must_use]
pub fn sanitize_identifier(raw: &str, space_replacement: &str) -> String {
    let replaced = raw.trim().replace(' ', space_replacement);
    replaced
        .chars()
        .filter(|c| !matches!(c, ':' | '.' | ',' | '\'' | '"'))
        .take(MAX_IDENTIFIER_LEN)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

/// Returns the flat on-disk name for a catalog file.
///
/// Catalog file names may contain sub-directories (`scans/page.pdf`); only the
/// last segment is kept. Characters invalid on common filesystems are replaced
/// with `_`, and `.`/`..` segments are rewritten.
#[must_use]
pub fn flat_file_name(name: &str) -> String {
    let last = name
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("");

    let sanitized: String = last
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
