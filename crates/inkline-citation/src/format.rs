//! Style-specific reference rendering.
//!
//! Pure functions from citation metadata to a plain-text bibliographic entry.
//! Missing metadata degrades the entry (filename-derived authors and titles,
//! `[No author]` placeholders) but never fails.

use crate::citation::ChunkCitation;
use crate::filename;
use crate::style::CitationStyle;
use chrono::{Datelike, NaiveDate};

/// Render one citation as a reference entry in the requested style.
///
/// Access-date lines (MLA, Chicago) use the current local date; use
/// [`format_reference_on`] in tests that need a fixed date.
pub fn format_reference(citation: &ChunkCitation, style: CitationStyle) -> String {
    format_reference_on(citation, style, chrono::Local::now().date_naive())
}

/// Render one citation as a reference entry, with an explicit "today" for
/// access-date lines.
pub fn format_reference_on(
    citation: &ChunkCitation,
    style: CitationStyle,
    today: NaiveDate,
) -> String {
    match style {
        CitationStyle::Apa => format_apa(citation),
        CitationStyle::Chicago => format_chicago(citation, today),
        CitationStyle::Mla => format_mla(citation, today),
        // No dedicated IEEE layout; it shares the plain default rendering.
        CitationStyle::Ieee => format_default(citation),
    }
}

/// APA: authors, (year), italic title or journal, then link or page.
fn format_apa(citation: &ChunkCitation) -> String {
    let mut parts = Vec::new();

    if !citation.authors.is_empty() {
        let authors = &citation.authors;
        if authors.len() == 1 {
            parts.push(format!("{}.", authors[0]));
        } else if authors.len() <= 6 {
            let leading = authors[..authors.len() - 1].join(", ");
            parts.push(format!("{}, & {}.", leading, authors[authors.len() - 1]));
        } else {
            parts.push(format!("{} et al.", authors[0]));
        }
    } else {
        let extracted = filename::extract_authors(&citation.source_name);
        match extracted.len() {
            0 => parts.push("[No author].".to_string()),
            1 => parts.push(format!("{}.", extracted[0])),
            _ => parts.push(format!("{} et al.", extracted[0])),
        }
    }

    if let Some(date) = citation.publication_date {
        parts.push(format!("({}).", date.year()));
    }

    if let Some(ref journal) = citation.journal {
        parts.push(format!("*{}*.", journal));
    } else {
        let title = filename::extract_title(&citation.source_name);
        parts.push(format!("*{}*.", title));
    }

    if let Some(ref link) = citation.external_link {
        parts.push(format!("Retrieved from {}", link));
    } else {
        parts.push(format!("Page {}.", citation.page_number));
    }

    parts.join(" ")
}

/// Chicago: authors, quoted title with journal, (year):, page, access line.
fn format_chicago(citation: &ChunkCitation, today: NaiveDate) -> String {
    let mut parts = Vec::new();

    let authors = citation.resolved_authors();
    match authors.len() {
        0 => {}
        1 => parts.push(format!("{}.", authors[0])),
        _ => parts.push(format!("{} et al.", authors[0])),
    }

    let title = filename::extract_title(&citation.source_name);
    if let Some(ref journal) = citation.journal {
        parts.push(format!("\"{}.\" *{}*", title, journal));
    } else {
        parts.push(format!("*{}*.", title));
    }

    if let Some(date) = citation.publication_date {
        parts.push(format!("({}):", date.year()));
    }

    parts.push(format!("{}.", citation.page_number));

    if let Some(ref link) = citation.external_link {
        parts.push(format!(
            "Accessed {}. {}.",
            today.format("%B %d, %Y"),
            link
        ));
    }

    parts.join(" ")
}

/// MLA: author, quoted title, journal, year, page, "Web" access line.
fn format_mla(citation: &ChunkCitation, today: NaiveDate) -> String {
    let mut parts = Vec::new();

    if let Some(author) = citation.resolved_authors().first() {
        parts.push(format!("{}.", author));
    }

    let title = filename::extract_title(&citation.source_name);
    parts.push(format!("\"{}.\"", title));

    if let Some(ref journal) = citation.journal {
        parts.push(format!("*{}*,", journal));
    }

    if let Some(date) = citation.publication_date {
        parts.push(format!("{},", date.year()));
    }

    parts.push(format!("p. {}.", citation.page_number));

    if citation.external_link.is_some() {
        parts.push(format!("Web. {}.", today.format("%d %b %Y")));
    }

    parts.join(" ")
}

/// Unstyled fallback: authors, title, page and link joined with periods.
fn format_default(citation: &ChunkCitation) -> String {
    let mut parts = Vec::new();

    let authors = citation.resolved_authors();
    if !authors.is_empty() {
        parts.push(authors.join(", "));
    }

    parts.push(filename::extract_title(&citation.source_name));
    parts.push(format!("Page {}", citation.page_number));

    if let Some(ref link) = citation.external_link {
        parts.push(format!("Available at: {}", link));
    }

    parts.join(". ") + "."
}
