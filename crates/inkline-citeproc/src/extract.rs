//! Boundary adapter for loosely-typed retrieval metadata.
//!
//! The retrieval layer hands back free text plus a metadata mapping whose
//! keys and value types vary by backend (`source` vs `pdf_name`, numeric vs
//! string pages, a single author vs a list). [`ChunkMetadata`] absorbs all
//! of that here, and [`citation_from_chunk`] converts it into a strict
//! [`ChunkCitation`] without ever failing; missing or unparseable fields get
//! defaults instead. Tolerance lives in this module only.

use crate::registry::RegistryConfig;
use chrono::NaiveDate;
use inkline_citation::ChunkCitation;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use uuid::Uuid;

/// Source name used when the retrieval layer supplied none.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// A value that may arrive as either a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    String(String),
    Number(i64),
}

impl StringOrNumber {
    /// Get the value as a string.
    pub fn as_str(&self) -> String {
        match self {
            StringOrNumber::String(s) => s.clone(),
            StringOrNumber::Number(n) => n.to_string(),
        }
    }

    /// Interpret the value as a 1-based page number. String values yield
    /// their first run of digits ("p. 12-14" reads as 12); anything else
    /// falls back to page 1.
    pub fn as_page_number(&self) -> u32 {
        match self {
            StringOrNumber::Number(n) if *n >= 1 => *n as u32,
            StringOrNumber::Number(_) => 1,
            StringOrNumber::String(s) => first_digit_run(s).unwrap_or(1).max(1),
        }
    }
}

fn first_digit_run(s: &str) -> Option<u32> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Loosely-typed metadata for one retrieved passage. Every field is optional
/// and several accept the alternate key names seen across retrieval backends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkMetadata {
    /// Originating file name.
    #[serde(alias = "pdf_name")]
    pub source: Option<String>,

    /// Page number; numeric or free-form string.
    pub page: Option<StringOrNumber>,

    /// Section or chapter within the source.
    #[serde(alias = "chapter")]
    pub section: Option<String>,

    /// One author or a list of authors.
    #[serde(default, deserialize_with = "string_or_list")]
    pub authors: Vec<String>,

    /// Publication date; full dates, datetimes and bare years all parse.
    #[serde(default, deserialize_with = "lenient_date")]
    pub publication_date: Option<NaiveDate>,

    pub publisher: Option<String>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<StringOrNumber>,
    pub issue: Option<StringOrNumber>,

    /// External URL for the source.
    pub url: Option<String>,

    /// Local path the source was ingested from; used as the external link
    /// when no URL is present.
    pub file_path: Option<String>,

    /// Everything else the backend sent, preserved for configured
    /// carry-through fields.
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl ChunkMetadata {
    /// The link to attach to the citation: URL first, ingest path second.
    pub fn external_link(&self) -> Option<&str> {
        self.url.as_deref().or(self.file_path.as_deref())
    }
}

/// One retrieved passage as handed over by the retrieval layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrievedChunk {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: ChunkMetadata,
    #[serde(default)]
    pub chunk_id: Option<String>,
}

/// Convert a retrieved passage into a strict [`ChunkCitation`].
///
/// Never fails: absent source names become [`UNKNOWN_SOURCE`], absent pages
/// become 1, the excerpt is truncated to the model's limit, and a missing
/// chunk id is synthesized. Fields named in `config.custom_metadata_fields`
/// are copied from the metadata's unrecognized keys onto the citation.
pub fn citation_from_chunk(
    content: &str,
    metadata: &ChunkMetadata,
    chunk_id: Option<String>,
    config: &RegistryConfig,
) -> ChunkCitation {
    let chunk_id = chunk_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let source_name = metadata
        .source
        .clone()
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
    let page_number = metadata
        .page
        .as_ref()
        .map(StringOrNumber::as_page_number)
        .unwrap_or(1);

    let mut citation = ChunkCitation::new(chunk_id, source_name, page_number);
    citation.text_excerpt = ChunkCitation::truncate_excerpt(content);
    citation.section = metadata.section.clone();
    citation.authors = metadata.authors.clone();
    citation.publication_date = metadata.publication_date;
    citation.publisher = metadata.publisher.clone();
    citation.doi = metadata.doi.clone();
    citation.isbn = metadata.isbn.clone();
    citation.journal = metadata.journal.clone();
    citation.volume = metadata.volume.as_ref().map(StringOrNumber::as_str);
    citation.issue = metadata.issue.as_ref().map(StringOrNumber::as_str);
    citation.external_link = metadata.external_link().map(str::to_string);
    citation.style = config.style;

    for field in &config.custom_metadata_fields {
        if let Some(value) = metadata.other.get(field) {
            citation.extra.insert(field.clone(), value.clone());
        }
    }

    citation
}

/// Accept either `"authors": "Smith"` or `"authors": ["Smith", "Jones"]`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(author)) => vec![author],
        Some(OneOrMany::Many(authors)) => authors,
    })
}

/// Parse a date out of whatever the backend sent: `YYYY-MM-DD`, an ISO
/// datetime, or a bare year (string or number). Unparseable values read as
/// absent rather than failing the whole metadata mapping.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(date_from_value))
}

fn date_from_value(value: &serde_json::Value) -> Option<NaiveDate> {
    match value {
        serde_json::Value::String(s) => date_from_str(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(year_to_date),
        _ => None,
    }
}

fn date_from_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    // ISO datetimes: the leading ten characters are the date.
    if let Some(prefix) = s.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    if s.len() == 4 {
        return s.parse::<i64>().ok().and_then(year_to_date);
    }
    None
}

fn year_to_date(year: i64) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}
