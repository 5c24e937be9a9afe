//! Citation metadata model and reference formatting.
//!
//! This crate is the pure layer of the citation engine: value types for cited
//! source excerpts, the closed set of citation styles, and style-aware
//! rendering of reference entries. It holds no state and performs no I/O;
//! the stateful registry and tracking machinery lives in `inkline-citeproc`.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     inkline-citeproc                       │
//! │        (registries, tracking, injection, export)           │
//! └──────────────────────────────┬─────────────────────────────┘
//!                                │
//!                                ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                     inkline-citation                       │
//! │              (metadata model + formatting)                 │
//! │        ChunkCitation + CitationStyle → reference text      │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod citation;
pub mod filename;
pub mod format;
pub mod style;

pub use citation::{ChunkCitation, EXCERPT_MAX_CHARS};
pub use format::{format_reference, format_reference_on};
pub use style::CitationStyle;
