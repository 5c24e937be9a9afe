//! Citation export serialization: JSON, BibTeX and RIS.

use crate::error::{Error, Result};
use crate::registry::DocumentCitationRegistry;
use inkline_citation::format::format_reference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported export payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    BibTex,
    Ris,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::BibTex => "bibtex",
            ExportFormat::Ris => "ris",
        }
    }

    /// Strict parse of a format name.
    pub fn from_name(name: &str) -> Result<ExportFormat> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "bibtex" => Ok(ExportFormat::BibTex),
            "ris" => Ok(ExportFormat::Ris),
            _ => Err(Error::UnsupportedExportFormat {
                format: name.to_string(),
            }),
        }
    }

    /// Parse a format name, falling back to JSON for anything unrecognized.
    pub fn from_name_lenient(name: &str) -> ExportFormat {
        ExportFormat::from_name(name).unwrap_or(ExportFormat::Json)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One JSON export record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub citation_number: u32,
    /// The reference entry, formatted in the citation's own style.
    pub text: String,
    pub source: String,
    pub page: u32,
}

/// Serialize a registry's citations in the requested format.
pub fn export_registry(registry: &DocumentCitationRegistry, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(registry),
        ExportFormat::BibTex => Ok(export_bibtex(registry)),
        ExportFormat::Ris => Ok(export_ris(registry)),
    }
}

fn export_json(registry: &DocumentCitationRegistry) -> Result<String> {
    let records: Vec<ExportRecord> = registry
        .inline_citations()
        .iter()
        .map(|inline| ExportRecord {
            citation_number: inline.citation_number,
            text: format_reference(&inline.citation, inline.citation.style),
            source: inline.citation.source_name.clone(),
            page: inline.citation.page_number,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// One `@article`/`@misc` entry per citation, keyed `cite<N>`. Journal-backed
/// citations become `@article`; everything else is `@misc`.
fn export_bibtex(registry: &DocumentCitationRegistry) -> String {
    let config = registry.config();
    let mut entries = Vec::new();

    for inline in registry.inline_citations() {
        let citation = &inline.citation;
        let entry_type = if citation.journal.is_some() {
            "article"
        } else {
            "misc"
        };

        let mut lines = vec![format!("@{}{{cite{},", entry_type, inline.citation_number)];

        if !citation.authors.is_empty() {
            lines.push(format!("  author = {{{}}},", citation.authors.join(" and ")));
        }
        lines.push(format!("  title = {{{}}},", citation.source_name));
        lines.push(format!("  pages = {{{}}},", citation.page_number));
        if let Some(ref journal) = citation.journal {
            lines.push(format!("  journal = {{{}}},", journal));
        }
        if let Some(date) = citation.publication_date {
            use chrono::Datelike;
            lines.push(format!("  year = {{{}}},", date.year()));
        }
        if config.include_doi {
            if let Some(ref doi) = citation.doi {
                lines.push(format!("  doi = {{{}}},", doi));
            }
        }
        if config.include_url {
            if let Some(ref link) = citation.external_link {
                lines.push(format!("  url = {{{}}},", link));
            }
        }
        lines.push("}".to_string());
        entries.push(lines.join("\n"));
    }

    entries.join("\n\n")
}

/// Tag-per-line RIS records, each terminated by `ER`.
fn export_ris(registry: &DocumentCitationRegistry) -> String {
    let config = registry.config();
    let mut entries = Vec::new();

    for inline in registry.inline_citations() {
        let citation = &inline.citation;
        let mut lines = vec!["TY  - JOUR".to_string()];

        for author in &citation.authors {
            lines.push(format!("AU  - {}", author));
        }
        lines.push(format!("TI  - {}", citation.source_name));
        lines.push(format!("SP  - {}", citation.page_number));
        if let Some(ref journal) = citation.journal {
            lines.push(format!("JO  - {}", journal));
        }
        if let Some(date) = citation.publication_date {
            use chrono::Datelike;
            lines.push(format!("PY  - {}", date.year()));
        }
        if config.include_doi {
            if let Some(ref doi) = citation.doi {
                lines.push(format!("DO  - {}", doi));
            }
        }
        if config.include_url {
            if let Some(ref link) = citation.external_link {
                lines.push(format!("UR  - {}", link));
            }
        }
        lines.push("ER  - ".to_string());
        entries.push(lines.join("\n"));
    }

    entries.join("\n\n")
}
