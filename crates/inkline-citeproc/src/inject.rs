//! Inline citation marker placement.
//!
//! Two strategies. The paragraph strategy appends one plain `[N]` marker per
//! substantial paragraph and is what the generation pipeline uses by
//! default. The point strategy inserts HTML markers at explicit byte
//! offsets, detecting sentence boundaries when the caller supplies none.

use crate::registry::InlineCitation;

/// Paragraphs shorter than this (trimmed) never receive a marker; they are
/// headings, list stubs and similar structure.
pub const MIN_PARAGRAPH_LEN: usize = 50;

/// Append one citation marker per qualifying paragraph, consuming citations
/// in order.
///
/// Text splits on blank lines. A marker lands just before the paragraph's
/// trailing period when there is one, else at its end. When citations
/// outnumber qualifying paragraphs the leftovers are appended, space
/// separated, to the final qualifying paragraph; when paragraphs outnumber
/// citations the rest of the text is left untouched.
pub fn append_citations_to_paragraphs(content: &str, citations: &[InlineCitation]) -> String {
    if citations.is_empty() {
        return content.to_string();
    }

    let mut paragraphs: Vec<String> = content.split("\n\n").map(str::to_string).collect();
    let qualifying: Vec<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.trim().len() >= MIN_PARAGRAPH_LEN)
        .map(|(i, _)| i)
        .collect();
    if qualifying.is_empty() {
        return content.to_string();
    }

    for (slot, &index) in qualifying.iter().enumerate() {
        if let Some(inline) = citations.get(slot) {
            paragraphs[index] = append_marker(&paragraphs[index], &inline.marker_text);
        }
    }

    if citations.len() > qualifying.len() {
        let leftover = citations[qualifying.len()..]
            .iter()
            .map(|inline| inline.marker_text.clone())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(&last) = qualifying.last() {
            paragraphs[last] = append_marker(&paragraphs[last], &leftover);
        }
    }

    paragraphs.join("\n\n")
}

/// Place `marker` before a trailing period, or at the end otherwise.
fn append_marker(paragraph: &str, marker: &str) -> String {
    let trimmed = paragraph.trim_end();
    match trimmed.strip_suffix('.') {
        Some(body) => format!("{} {}.", body, marker),
        None => format!("{} {}", trimmed, marker),
    }
}

/// Detect insertion offsets for `num_citations` markers.
///
/// Sentence boundaries are `.`, `!` or `?` followed by whitespace; the
/// offset is the position after that whitespace run. With more boundaries
/// than citations the markers spread evenly; with fewer it is one marker per
/// boundary. Text without any boundary is divided into equal spans.
pub fn detect_citation_points(content: &str, num_citations: usize) -> Vec<usize> {
    if num_citations == 0 {
        return Vec::new();
    }

    let boundaries = sentence_boundaries(content);

    if boundaries.is_empty() {
        return (1..=num_citations)
            .map(|i| floor_char_boundary(content, i * content.len() / num_citations))
            .collect();
    }

    if boundaries.len() <= num_citations {
        return boundaries;
    }

    let step = boundaries.len() / num_citations;
    (0..num_citations).map(|i| boundaries[i * step]).collect()
}

/// Byte offsets just past each `[.!?]` + whitespace run.
fn sentence_boundaries(content: &str) -> Vec<usize> {
    let bytes = content.as_bytes();
    let mut points = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j > i + 1 {
                points.push(j);
                i = j;
                continue;
            }
        }
        i += 1;
    }
    points
}

fn floor_char_boundary(content: &str, mut index: usize) -> usize {
    index = index.min(content.len());
    while index > 0 && !content.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Insert HTML markers at the given byte offsets of the original text.
///
/// Citations pair with offsets in order; insertion runs back-to-front so
/// earlier offsets stay valid.
pub fn inject_at_points(
    content: &str,
    citations: &[InlineCitation],
    points: &[usize],
    with_tooltips: bool,
) -> String {
    let mut pairs: Vec<(&InlineCitation, usize)> = citations
        .iter()
        .zip(points.iter().copied())
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));

    let mut result = content.to_string();
    for (inline, point) in pairs {
        let at = floor_char_boundary(&result, point);
        result.insert_str(at, &render_marker_html(inline, with_tooltips));
    }
    result
}

/// Render one marker as a superscript anchor for the document viewer.
///
/// The anchor links marker and reference entry both ways via `cite-N` /
/// `ref-N` ids; the hover summary rides along as `data-tooltip` and `title`
/// unless tooltips are disabled.
pub fn render_marker_html(inline: &InlineCitation, with_tooltip: bool) -> String {
    let tooltip_attrs = if with_tooltip {
        let escaped = inline.hover_content.replace('"', "&quot;");
        format!(" data-tooltip=\"{0}\" title=\"{0}\"", escaped)
    } else {
        String::new()
    };

    format!(
        "<span class=\"citation-wrapper\"><sup><a href=\"#{}\" id=\"{}\" class=\"citation-link\"{}>{}</a></sup></span>",
        inline.reference_id(),
        inline.anchor_id(),
        tooltip_attrs,
        inline.citation_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{DocumentCitationRegistry, RegistryConfig};
    use inkline_citation::ChunkCitation;

    fn citations(n: usize) -> Vec<InlineCitation> {
        let mut registry =
            DocumentCitationRegistry::new("doc", "session", RegistryConfig::default());
        (0..n)
            .map(|i| {
                registry.add_citation(ChunkCitation::new(
                    format!("chunk-{}", i),
                    format!("doc{}.pdf", i),
                    1,
                ))
            })
            .collect()
    }

    const PARA: &str =
        "This is a reasonably long paragraph of generated prose that easily clears the threshold.";

    #[test]
    fn test_one_marker_per_paragraph() {
        let text = format!("{}\n\n{}\n\n{}", PARA, PARA, PARA);
        let cites = citations(2);
        let result = append_citations_to_paragraphs(&text, &cites);
        let paragraphs: Vec<&str> = result.split("\n\n").collect();
        assert!(paragraphs[0].ends_with("threshold [1]."));
        assert!(paragraphs[1].ends_with("threshold [2]."));
        assert_eq!(paragraphs[2], PARA);
    }

    #[test]
    fn test_leftover_citations_land_on_last_paragraph() {
        let text = format!("{}\n\n{}", PARA, PARA);
        let cites = citations(4);
        let result = append_citations_to_paragraphs(&text, &cites);
        let paragraphs: Vec<&str> = result.split("\n\n").collect();
        assert!(paragraphs[0].ends_with("threshold [1]."));
        assert!(paragraphs[1].ends_with("threshold [2] [3] [4]."));
    }

    #[test]
    fn test_short_paragraphs_are_skipped() {
        let text = format!("## Heading\n\n{}", PARA);
        let cites = citations(1);
        let result = append_citations_to_paragraphs(&text, &cites);
        let paragraphs: Vec<&str> = result.split("\n\n").collect();
        assert_eq!(paragraphs[0], "## Heading");
        assert!(paragraphs[1].ends_with("[1]."));
    }

    #[test]
    fn test_no_qualifying_paragraph_leaves_text_unchanged() {
        let text = "Too short.\n\nAlso short.";
        let cites = citations(2);
        assert_eq!(append_citations_to_paragraphs(text, &cites), text);
    }

    #[test]
    fn test_marker_lands_before_trailing_period() {
        let text = PARA.to_string();
        let result = append_citations_to_paragraphs(&text, &citations(1));
        assert!(result.ends_with("clears the threshold [1]."));
    }

    #[test]
    fn test_sentence_boundaries() {
        let points = sentence_boundaries("One. Two! Three? Four");
        assert_eq!(points, vec![5, 10, 17]);
    }

    #[test]
    fn test_detect_points_one_per_boundary_when_scarce() {
        let text = "First sentence. Second sentence. Third.";
        let points = detect_citation_points(text, 5);
        assert_eq!(points, sentence_boundaries(text));
    }

    #[test]
    fn test_detect_points_without_boundaries_divides_evenly() {
        let text = "x".repeat(100);
        let points = detect_citation_points(&text, 4);
        assert_eq!(points, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_inject_at_points_keeps_offsets_stable() {
        let text = "Alpha. Beta. Gamma.";
        let cites = citations(2);
        let result = inject_at_points(text, &cites, &[7, 13], false);
        let first = result.find(">1</a>").unwrap();
        let second = result.find(">2</a>").unwrap();
        assert!(first < second);
        assert!(result.starts_with("Alpha. "));
        assert!(result.contains("Beta. "));
    }

    #[test]
    fn test_marker_html_shape() {
        let cites = citations(1);
        let html = render_marker_html(&cites[0], true);
        assert!(html.contains("href=\"#ref-1\""));
        assert!(html.contains("id=\"cite-1\""));
        assert!(html.contains("data-tooltip=\""));
        assert!(html.contains("<sup>"));
        assert!(html.ends_with("</a></sup></span>"));

        let bare = render_marker_html(&cites[0], false);
        assert!(!bare.contains("data-tooltip"));
        assert!(!bare.contains("title="));
    }
}
