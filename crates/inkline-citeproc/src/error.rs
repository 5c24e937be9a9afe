//! Error types for citation tracking.
//!
//! Only structural misuse surfaces as an error: operating on a document that
//! has no registry, or strictly parsing an unknown style or export format.
//! Malformed retrieval metadata never errors; the extraction boundary
//! substitutes defaults instead (see `extract`).

use thiserror::Error;

/// Result type alias for inkline-citeproc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during citation tracking.
#[derive(Debug, Error)]
pub enum Error {
    /// No registry has been created for this document. Registries are never
    /// auto-created on write; creation is an explicit, separate call.
    #[error("no citation registry found for document '{document_id}'")]
    RegistryNotFound { document_id: String },

    /// Strict parse of an unknown export format name.
    #[error("unsupported export format '{format}'")]
    UnsupportedExportFormat { format: String },

    /// Strict parse of an unknown citation style name.
    #[error("unsupported citation style '{style}'")]
    UnsupportedStyle { style: String },

    /// Export payload serialization failed.
    #[error("failed to serialize citations: {0}")]
    Serialization(#[from] serde_json::Error),
}
