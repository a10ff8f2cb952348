//! Catalog data model: search requests/results and item metadata.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Sort key requesting the most-viewed-this-week items first.
pub const SORT_WEEK_DESCENDING: &str = "-week";

/// A single page request against the catalog search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Fully built query text (field clause, essential clause, languages).
    pub query: String,
    /// Field projection requested for each result.
    pub fields: Vec<String>,
    /// Sort keys; a leading `-` means descending.
    pub sorts: Vec<String>,
    /// Number of results per page.
    pub rows: u32,
    /// 1-based page number.
    pub page: u32,
}

impl SearchRequest {
    /// Creates a request for `page` of `query` projected onto title and identifier,
    /// sorted by weekly views descending.
    #[must_use]
    pub fn titles_by_week(query: impl Into<String>, rows: u32, page: u32) -> Self {
        Self {
            query: query.into(),
            fields: vec!["title".to_string(), "identifier".to_string()],
            sorts: vec![SORT_WEEK_DESCENDING.to_string()],
            rows,
            page,
        }
    }
}

/// Lightweight record returned per search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    /// Display title; empty when the catalog omits it.
    #[serde(default, deserialize_with = "text_or_first")]
    pub title: String,
    /// Unique catalog identifier.
    pub identifier: String,
}

impl SearchResult {
    /// Creates a search result.
    #[must_use]
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: identifier.into(),
        }
    }
}

/// Collection membership of an item; the catalog sends either a bare string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Collection {
    /// Item belongs to exactly one collection.
    Single(String),
    /// Item belongs to several collections, in catalog order.
    Multiple(Vec<String>),
}

impl Collection {
    /// Renders the collections as a path-like string, each name followed by `/`.
    #[must_use]
    pub fn as_path(&self) -> String {
        match self {
            Self::Single(name) => format!("{name}/"),
            Self::Multiple(names) => names.iter().map(|name| format!("{name}/")).collect(),
        }
    }
}

/// One file attached to a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRecord {
    /// File name relative to the item root.
    pub name: String,
    /// Catalog-assigned format label (e.g. `Text PDF`).
    #[serde(default)]
    pub format: String,
    /// Size in bytes; `None` when the catalog does not report one.
    #[serde(default, deserialize_with = "size_in_bytes")]
    pub size: Option<u64>,
}

impl FileRecord {
    /// Creates a file record.
    #[must_use]
    pub fn new(name: impl Into<String>, format: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            size,
        }
    }
}

/// Metadata for a single catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    /// Unique catalog identifier.
    pub identifier: String,
    /// Item title; empty when the catalog omits it.
    pub title: String,
    /// Collection membership, if reported.
    pub collection: Option<Collection>,
    /// Files attached to the item.
    pub files: Vec<FileRecord>,
}

impl ItemMetadata {
    /// Returns the `collection/` diagnostic string, empty when no collection is known.
    #[must_use]
    pub fn collections_path(&self) -> String {
        self.collection
            .as_ref()
            .map(Collection::as_path)
            .unwrap_or_default()
    }
}

/// Accepts `"text"`, `["text", ...]` (first element wins) or null.
pub(crate) fn text_or_first<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        One(String),
        Many(Vec<String>),
    }

    let value = Option::<Text>::deserialize(deserializer)?;
    Ok(match value {
        Some(Text::One(text)) => text,
        Some(Text::Many(list)) => list.into_iter().next().unwrap_or_default(),
        None => String::new(),
    })
}

/// Accepts sizes encoded as strings (`"1024"`) or numbers; anything else becomes `None`.
fn size_in_bytes<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}
