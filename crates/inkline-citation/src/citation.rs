//! Citation metadata for retrieved source excerpts.

use crate::filename;
use crate::style::CitationStyle;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum stored excerpt length, in characters. Longer source text is
/// truncated with a trailing ellipsis.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Citation metadata for one cited source excerpt.
///
/// Immutable value object: built once at the retrieval boundary and never
/// mutated afterwards. Two citations with the same `(source_name,
/// page_number)` key describe the same physical source and must collapse to
/// one reference entry; see [`ChunkCitation::source_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkCitation {
    /// Opaque unique identifier for the content chunk.
    pub chunk_id: String,

    /// Display name of the originating file.
    pub source_name: String,

    /// Page number in the source, 1-based.
    pub page_number: u32,

    /// Section or chapter within the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    /// Truncated source text, for hover and debug display.
    pub text_excerpt: String,

    /// Ordered author list. Empty when unknown; the reference formatter then
    /// derives authors from the filename.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(rename = "ISBN", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    /// URL to the external source, when the excerpt came from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,

    /// Citation style this excerpt should be rendered with.
    #[serde(default)]
    pub style: CitationStyle,

    /// Extra metadata carried through from the retrieval layer, keyed by the
    /// field names the caller configured.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ChunkCitation {
    /// Create a citation with the required identity fields; everything else
    /// starts empty.
    pub fn new(
        chunk_id: impl Into<String>,
        source_name: impl Into<String>,
        page_number: u32,
    ) -> ChunkCitation {
        ChunkCitation {
            chunk_id: chunk_id.into(),
            source_name: source_name.into(),
            page_number: page_number.max(1),
            section: None,
            text_excerpt: String::new(),
            authors: Vec::new(),
            publication_date: None,
            publisher: None,
            doi: None,
            isbn: None,
            journal: None,
            volume: None,
            issue: None,
            external_link: None,
            style: CitationStyle::default(),
            extra: HashMap::new(),
        }
    }

    /// The content-addressed deduplication key: same file, same page.
    pub fn source_key(&self) -> (&str, u32) {
        (self.source_name.as_str(), self.page_number)
    }

    /// Authors to display: the explicit list when present, otherwise derived
    /// from the source filename.
    pub fn resolved_authors(&self) -> Vec<String> {
        if self.authors.is_empty() {
            filename::extract_authors(&self.source_name)
        } else {
            self.authors.clone()
        }
    }

    /// One-line hover summary: author(s), title, page, section and year,
    /// joined with a bullet separator. Absent fields are omitted.
    pub fn hover_summary(&self) -> String {
        let mut parts = Vec::new();

        let authors = self.resolved_authors();
        if !authors.is_empty() {
            let mut shown = authors[..authors.len().min(2)].join(", ");
            if authors.len() > 2 {
                shown.push_str(" et al.");
            }
            parts.push(shown);
        }

        let title = filename::extract_title(&self.source_name);
        if title != self.source_name {
            parts.push(title);
        }

        parts.push(format!("Page {}", self.page_number));

        if let Some(ref section) = self.section {
            parts.push(section.clone());
        }

        if let Some(date) = self.publication_date {
            use chrono::Datelike;
            parts.push(date.year().to_string());
        }

        parts.join(" \u{2022} ")
    }

    /// Truncate source text to [`EXCERPT_MAX_CHARS`], appending an ellipsis
    /// when anything was cut.
    pub fn truncate_excerpt(text: &str) -> String {
        if text.chars().count() <= EXCERPT_MAX_CHARS {
            text.to_string()
        } else {
            let mut excerpt: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
            excerpt.push_str("...");
            excerpt
        }
    }
}
