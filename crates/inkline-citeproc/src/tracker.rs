//! The citation tracking façade used by the generation pipeline.
//!
//! A [`CitationTracker`] owns the engine configuration and a handle to the
//! shared [`CitationStore`]. The pipeline calls it at three moments: when
//! retrieval hands back chunks (extract and track), when a section of prose
//! has been generated (inject markers), and when the document is assembled
//! (references section, statistics, export).

use crate::error::{Error, Result};
use crate::export::{self, ExportFormat};
use crate::extract::{self, ChunkMetadata, RetrievedChunk};
use crate::inject;
use crate::registry::{InlineCitation, RegistryConfig};
use crate::store::{lock_registry, CitationStore, SharedRegistry};
use inkline_citation::{ChunkCitation, CitationStyle};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Heading that opens a rendered references section.
pub const REFERENCES_HEADING: &str = "## References";

/// Summary counts for one document's citations.
#[derive(Debug, Clone, Serialize)]
pub struct CitationStatistics {
    pub total_citations: usize,
    pub unique_sources: usize,
    pub style: CitationStyle,
    pub sources: Vec<String>,
    pub auto_references_enabled: bool,
}

/// Stateless orchestrator over the shared registry store.
///
/// Cheap to clone; clones share the same store and carry the same
/// configuration.
#[derive(Debug, Clone)]
pub struct CitationTracker {
    config: RegistryConfig,
    store: Arc<CitationStore>,
}

impl CitationTracker {
    pub fn new(store: Arc<CitationStore>) -> CitationTracker {
        CitationTracker::with_config(store, RegistryConfig::default())
    }

    pub fn with_config(store: Arc<CitationStore>, config: RegistryConfig) -> CitationTracker {
        CitationTracker { config, store }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<CitationStore> {
        &self.store
    }

    /// Create (or fetch) the registry for a document, configured with this
    /// tracker's settings.
    pub fn create_registry(&self, document_id: &str, session_id: &str) -> SharedRegistry {
        self.store
            .create_registry(document_id, session_id, self.config.clone())
    }

    /// Look up an existing registry.
    pub fn registry(&self, document_id: &str) -> Option<SharedRegistry> {
        self.store.get(document_id)
    }

    /// Build a citation from one retrieved chunk without recording it.
    pub fn extract_citation_from_chunk(
        &self,
        content: &str,
        metadata: &ChunkMetadata,
        chunk_id: Option<String>,
    ) -> ChunkCitation {
        extract::citation_from_chunk(content, metadata, chunk_id, &self.config)
    }

    /// Build a citation from a retrieved chunk and, when a document id is
    /// given and its registry exists, record it there.
    pub fn track_chunk_citation(
        &self,
        content: &str,
        metadata: &ChunkMetadata,
        chunk_id: Option<String>,
        document_id: Option<&str>,
    ) -> ChunkCitation {
        let citation = self.extract_citation_from_chunk(content, metadata, chunk_id);

        if let Some(document_id) = document_id {
            match self.store.get(document_id) {
                Some(registry) => {
                    lock_registry(&registry).add_citation(citation.clone());
                }
                None => {
                    warn!(
                        "no registry for document {}, citation not recorded",
                        document_id
                    );
                }
            }
        }

        citation
    }

    /// Record a citation against a document's registry.
    pub fn add_citation_to_document(
        &self,
        document_id: &str,
        citation: ChunkCitation,
    ) -> Result<InlineCitation> {
        let registry = self
            .store
            .get(document_id)
            .ok_or_else(|| Error::RegistryNotFound {
                document_id: document_id.to_string(),
            })?;
        Ok(lock_registry(&registry).add_citation(citation))
    }

    /// Insert HTML citation markers into generated text.
    ///
    /// Offsets come from `points` when supplied, otherwise from sentence
    /// boundary detection. A tracker configured with inline citations off
    /// returns the text unchanged.
    pub fn inject_inline_citations(
        &self,
        content: &str,
        citations: &[InlineCitation],
        points: Option<Vec<usize>>,
    ) -> String {
        if citations.is_empty() || !self.config.show_inline_citations {
            return content.to_string();
        }

        let points =
            points.unwrap_or_else(|| inject::detect_citation_points(content, citations.len()));
        inject::inject_at_points(
            content,
            citations,
            &points,
            self.config.enable_hover_tooltips,
        )
    }

    /// Render the references section for a document. Absent registries and
    /// disabled auto-generation both yield an empty string.
    pub fn generate_references_section(&self, document_id: &str) -> String {
        if !self.config.auto_generate_references {
            return String::new();
        }
        match self.store.get(document_id) {
            Some(registry) => lock_registry(&registry).generate_references_section(),
            None => String::new(),
        }
    }

    /// Append the references section to assembled content, unless one is
    /// already present or there is nothing to append.
    pub fn append_references_to_content(&self, content: &str, document_id: &str) -> String {
        if content.contains(REFERENCES_HEADING) {
            debug!("document {} already has a references section", document_id);
            return content.to_string();
        }
        let references = self.generate_references_section(document_id);
        if references.is_empty() {
            return content.to_string();
        }
        format!("{}\n\n{}", content, references)
    }

    /// The full per-section pipeline: track every retrieved chunk, append
    /// one marker per substantial paragraph, and close with the references
    /// section.
    pub fn process_generated_content(
        &self,
        content: &str,
        document_id: &str,
        chunks: &[RetrievedChunk],
    ) -> Result<String> {
        let registry = self
            .store
            .get(document_id)
            .ok_or_else(|| Error::RegistryNotFound {
                document_id: document_id.to_string(),
            })?;

        let mut inlines = Vec::with_capacity(chunks.len());
        {
            let mut registry = lock_registry(&registry);
            for chunk in chunks {
                let citation = extract::citation_from_chunk(
                    &chunk.content,
                    &chunk.metadata,
                    chunk.chunk_id.clone(),
                    &self.config,
                );
                inlines.push(registry.add_citation(citation));
            }
        }
        // Duplicate chunks resolve to the same number; one marker each is
        // still placed, matching how often the text drew on the source.
        debug!(
            "tracked {} chunks for document {}",
            inlines.len(),
            document_id
        );

        let with_markers = if self.config.show_inline_citations {
            inject::append_citations_to_paragraphs(content, &inlines)
        } else {
            content.to_string()
        };

        Ok(self.append_references_to_content(&with_markers, document_id))
    }

    /// Summary statistics for a document's citations.
    pub fn get_citation_statistics(&self, document_id: &str) -> Result<CitationStatistics> {
        let registry = self
            .store
            .get(document_id)
            .ok_or_else(|| Error::RegistryNotFound {
                document_id: document_id.to_string(),
            })?;
        let registry = lock_registry(&registry);
        let sources = registry.unique_sources();
        Ok(CitationStatistics {
            total_citations: registry.len(),
            unique_sources: sources.len(),
            style: registry.config().style,
            sources,
            auto_references_enabled: registry.config().auto_generate_references,
        })
    }

    /// Serialize a document's citations in the requested format.
    pub fn export_citations(&self, document_id: &str, format: ExportFormat) -> Result<String> {
        let registry = self
            .store
            .get(document_id)
            .ok_or_else(|| Error::RegistryNotFound {
                document_id: document_id.to_string(),
            })?;
        let registry = lock_registry(&registry);
        export::export_registry(&registry, format)
    }
}
