//! Search query construction.

use std::fmt;

/// Builds a field-qualified clause: `field:(value)`, or `-field:(value)` when excluding.
#[must_use]
pub fn field_query(value: &str, field: &str, exclude: bool) -> String {
    if exclude {
        format!("-{field}:({value})")
    } else {
        format!("{field}:({value})")
    }
}

/// Builds the title clause used for one topic.
#[must_use]
pub fn title_query(topic: &str) -> String {
    field_query(topic, "title", false)
}

/// Full catalog query for one topic.
///
/// Renders as `<field clause> AND <essential clause> AND (languageSorter:(a) OR ...)`.
/// Empty essential clauses and empty language lists are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    field_clause: String,
    essential_clause: String,
    languages: Vec<String>,
}

impl SearchQuery {
    /// Creates a query from its three parts.
    #[must_use]
    pub fn new(
        field_clause: impl Into<String>,
        essential_clause: impl Into<String>,
        languages: &[String],
    ) -> Self {
        Self {
            field_clause: field_clause.into(),
            essential_clause: essential_clause.into(),
            languages: languages.to_vec(),
        }
    }

    /// Returns the language clause, or `None` when no languages are configured.
    #[must_use]
    pub fn language_clause(&self) -> Option<String> {
        if self.languages.is_empty() {
            return None;
        }
        let joined = self
            .languages
            .iter()
            .map(|language| format!("languageSorter:({language})"))
            .collect::<Vec<_>>()
            .join(" OR ");
        Some(format!("({joined})"))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field_clause)?;
        let essential = self.essential_clause.trim();
        if !essential.is_empty() {
            write!(f, " AND {essential}")?;
        }
        if let Some(languages) = self.language_clause() {
            write!(f, " AND {languages}")?;
        }
        Ok(())
    }
}
