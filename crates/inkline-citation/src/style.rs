//! Citation style tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bibliographic formatting convention.
///
/// The closed set of styles the reference formatter knows how to render.
/// Styles without a dedicated renderer (currently IEEE) fall through to the
/// default layout in [`crate::format`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitationStyle {
    #[default]
    #[serde(rename = "APA")]
    Apa,
    Chicago,
    #[serde(rename = "MLA")]
    Mla,
    #[serde(rename = "IEEE")]
    Ieee,
}

impl CitationStyle {
    /// The canonical display name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Mla => "MLA",
            CitationStyle::Ieee => "IEEE",
        }
    }

    /// Parse a style name, case-insensitively.
    pub fn from_name(name: &str) -> Option<CitationStyle> {
        let name = name.trim();
        [
            CitationStyle::Apa,
            CitationStyle::Chicago,
            CitationStyle::Mla,
            CitationStyle::Ieee,
        ]
        .into_iter()
        .find(|style| style.name().eq_ignore_ascii_case(name))
    }

    /// Parse a style name, falling back to APA for anything unrecognized.
    pub fn from_name_lenient(name: &str) -> CitationStyle {
        CitationStyle::from_name(name).unwrap_or_default()
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
