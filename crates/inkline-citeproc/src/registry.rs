//! Per-document citation registry: deduplication, stable numbering and the
//! rendered reference section.

use crate::error::{Error, Result};
use hashlink::{LinkedHashMap, LinkedHashSet};
use inkline_citation::format::format_reference;
use inkline_citation::{ChunkCitation, CitationStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strict parse of a citation style name, for callers wiring configuration
/// from request parameters. [`CitationStyle::from_name_lenient`] is the
/// fallback-to-APA alternative.
pub fn parse_style(name: &str) -> Result<CitationStyle> {
    CitationStyle::from_name(name).ok_or_else(|| Error::UnsupportedStyle {
        style: name.to_string(),
    })
}

/// Configuration recognized by registries and trackers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Default citation style for newly extracted citations.
    pub style: CitationStyle,
    /// Render a references section at document assembly time.
    pub auto_generate_references: bool,
    /// Insert inline citation markers into generated text.
    pub show_inline_citations: bool,
    /// Attach hover tooltips to rendered markers.
    pub enable_hover_tooltips: bool,
    /// Include DOIs in export payloads when available.
    pub include_doi: bool,
    /// Include URLs in export payloads when available.
    pub include_url: bool,
    /// Extra retrieval-metadata field names carried through onto citations.
    pub custom_metadata_fields: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            style: CitationStyle::default(),
            auto_generate_references: true,
            show_inline_citations: true,
            enable_hover_tooltips: true,
            include_doi: true,
            include_url: true,
            custom_metadata_fields: Vec::new(),
        }
    }
}

/// A numbered inline citation: the marker placed in generated text, linked to
/// its reference entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineCitation {
    /// Stable number, unique within the owning registry, assigned in
    /// first-seen order and never reused.
    pub citation_number: u32,

    /// The cited source excerpt.
    pub citation: ChunkCitation,

    /// Plain-text marker, `[N]`.
    pub marker_text: String,

    /// Tooltip summary shown when hovering the rendered marker.
    pub hover_content: String,
}

impl InlineCitation {
    fn new(citation_number: u32, citation: ChunkCitation) -> InlineCitation {
        let hover_content = citation.hover_summary();
        InlineCitation {
            citation_number,
            marker_text: format!("[{}]", citation_number),
            hover_content,
            citation,
        }
    }

    /// HTML anchor id carried by the inline marker.
    pub fn anchor_id(&self) -> String {
        format!("cite-{}", self.citation_number)
    }

    /// HTML anchor id of the matching reference entry.
    pub fn reference_id(&self) -> String {
        format!("ref-{}", self.citation_number)
    }
}

/// All citations for one output document.
///
/// The registry exclusively owns its [`InlineCitation`] entries; callers get
/// clones or borrowed views. It is append-only: numbers are never reassigned
/// or reused for the life of the document.
#[derive(Debug)]
pub struct DocumentCitationRegistry {
    document_id: String,
    session_id: String,
    /// Membership index by chunk id, in insertion order.
    citations: LinkedHashMap<String, ChunkCitation>,
    /// Presentation order = first-seen order.
    inline_citations: Vec<InlineCitation>,
    counter: u32,
    config: RegistryConfig,
}

impl DocumentCitationRegistry {
    pub fn new(
        document_id: impl Into<String>,
        session_id: impl Into<String>,
        config: RegistryConfig,
    ) -> DocumentCitationRegistry {
        DocumentCitationRegistry {
            document_id: document_id.into(),
            session_id: session_id.into(),
            citations: LinkedHashMap::new(),
            inline_citations: Vec::new(),
            counter: 0,
            config,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Ordered view of all inline citations.
    pub fn inline_citations(&self) -> &[InlineCitation] {
        &self.inline_citations
    }

    pub fn len(&self) -> usize {
        self.inline_citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inline_citations.is_empty()
    }

    /// Distinct source names, in first-citation order.
    pub fn unique_sources(&self) -> Vec<String> {
        let mut sources = LinkedHashSet::new();
        for inline in &self.inline_citations {
            sources.insert(inline.citation.source_name.clone());
        }
        sources.into_iter().collect()
    }

    /// Admit a citation, returning its stable inline entry.
    ///
    /// Deduplication is content-addressed on `(source_name, page_number)`:
    /// the same file and page always resolves to the same number, no matter
    /// how many distinct chunks cite it. A repeated `chunk_id` is a secondary
    /// match and also returns the existing entry. Only a genuinely new source
    /// consumes a number.
    pub fn add_citation(&mut self, chunk_citation: ChunkCitation) -> InlineCitation {
        let source_key = chunk_citation.source_key();
        if let Some(existing) = self
            .inline_citations
            .iter()
            .find(|inline| inline.citation.source_key() == source_key)
        {
            debug!(
                "reusing citation [{}] for {}, p. {}",
                existing.citation_number,
                chunk_citation.source_name,
                chunk_citation.page_number
            );
            return existing.clone();
        }

        if self.citations.contains_key(&chunk_citation.chunk_id) {
            if let Some(existing) = self
                .inline_citations
                .iter()
                .find(|inline| inline.citation.chunk_id == chunk_citation.chunk_id)
            {
                return existing.clone();
            }
        }

        self.counter += 1;
        self.citations
            .insert(chunk_citation.chunk_id.clone(), chunk_citation.clone());

        let inline = InlineCitation::new(self.counter, chunk_citation);
        debug!(
            "created citation [{}] for {}, p. {} in document {}",
            inline.citation_number,
            inline.citation.source_name,
            inline.citation.page_number,
            self.document_id
        );
        self.inline_citations.push(inline.clone());
        inline
    }

    /// Render the references section: a Markdown heading plus one numbered
    /// line per citation, in ascending number order. Empty registries yield
    /// an empty string so callers never emit a bare heading.
    pub fn generate_references_section(&self) -> String {
        if self.inline_citations.is_empty() {
            return String::new();
        }

        let mut lines = vec!["## References\n".to_string()];
        for inline in &self.inline_citations {
            let entry = format_reference(&inline.citation, inline.citation.style);
            lines.push(format!("{}. {}\n", inline.citation_number, entry));
        }

        lines.join("\n")
    }
}
