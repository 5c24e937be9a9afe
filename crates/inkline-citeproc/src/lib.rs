//! Citation tracking engine for RAG-assembled documents.
//!
//! Retrieval hands back loosely-typed chunks; this crate turns them into
//! deduplicated, stably numbered citations, places inline markers in
//! generated prose, and renders reference sections and export payloads.
//!
//! ```text
//!                  +-----------------------------+
//!   chunks ------> |  extract: ChunkMetadata     |
//!                  |  -> ChunkCitation           |
//!                  +--------------+--------------+
//!                                 |
//!                                 v
//!   CitationTracker --> CitationStore --> DocumentCitationRegistry
//!                                 |        (dedup, numbering)
//!                 +---------------+----------------+
//!                 v               v                v
//!           inject markers   references       export (json,
//!           ([N] / HTML)     section          bibtex, ris)
//! ```
//!
//! The pure formatting layer (citation model, style formatters, filename
//! heuristics) lives in the `inkline-citation` crate; this crate holds the
//! stateful engine.

pub mod error;
pub mod export;
pub mod extract;
pub mod inject;
pub mod registry;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};
pub use export::{ExportFormat, ExportRecord};
pub use extract::{ChunkMetadata, RetrievedChunk, UNKNOWN_SOURCE};
pub use registry::{parse_style, DocumentCitationRegistry, InlineCitation, RegistryConfig};
pub use store::{lock_registry, CitationStore, SharedRegistry};
pub use tracker::{CitationStatistics, CitationTracker, REFERENCES_HEADING};

pub use inkline_citation::{ChunkCitation, CitationStyle};
