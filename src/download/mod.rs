//! Local side of a download: naming, eligibility, and file transfer.
//!
//! - [`sanitize_identifier`] turns catalog titles into target directory names
//! - [`select_formats`] picks the format labels worth downloading
//! - [`write_response_to_file`] streams a file body to disk

mod filename;
mod format_filter;
mod transfer;

pub use filename::{MAX_IDENTIFIER_LEN, flat_file_name, sanitize_identifier};
pub use format_filter::{FormatRules, select_formats, size_in_mb};
pub use transfer::write_response_to_file;
