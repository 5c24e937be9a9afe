//! Filename-based author and title heuristics.
//!
//! Retrieval metadata often carries nothing beyond a source filename. When the
//! filename follows the common `author[-author2][-et-al]-YYYY-title-words.ext`
//! convention we can recover a usable author list and title from it. These
//! functions never fail: unparseable names degrade to an empty author list and
//! the raw filename as title.

/// Inclusive range of tokens treated as publication years.
const YEAR_MIN: u32 = 1900;
const YEAR_MAX: u32 = 2030;

/// Extract candidate author names from a source filename.
///
/// Tokens before the year are authors. A `-et-al-` run collapses the list to
/// the first author; otherwise each pre-year token becomes an author (capped
/// at three, with stray `et`/`al`/`and` tokens dropped). Without a year token
/// the first token alone is used.
pub fn extract_authors(file_name: &str) -> Vec<String> {
    let tokens: Vec<&str> = strip_extension(file_name).split('-').collect();

    if let Some(year_idx) = find_year_index(&tokens) {
        if year_idx > 0 {
            let author_tokens = &tokens[..year_idx];
            if has_et_al(author_tokens) {
                return vec![title_case(author_tokens[0])];
            }
            return author_tokens
                .iter()
                .filter(|t| !matches!(t.to_ascii_lowercase().as_str(), "et" | "al" | "and"))
                .take(3)
                .map(|t| title_case(t))
                .collect();
        }
    }

    match tokens.first() {
        Some(first) if !first.is_empty() => vec![title_case(first)],
        _ => Vec::new(),
    }
}

/// Extract a human-readable title from a source filename.
///
/// Tokens after the year are title-cased and joined with spaces. Without a
/// year token (or with nothing after it) the whole stem is title-cased; as a
/// last resort the raw filename is returned unchanged.
pub fn extract_title(file_name: &str) -> String {
    let tokens: Vec<&str> = strip_extension(file_name).split('-').collect();

    if let Some(year_idx) = find_year_index(&tokens) {
        if year_idx + 1 < tokens.len() {
            return join_title_cased(&tokens[year_idx + 1..]);
        }
    }

    let joined = join_title_cased(&tokens);
    if joined.is_empty() {
        file_name.to_string()
    } else {
        joined
    }
}

fn strip_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// Index of the first 4-digit token in the plausible year range.
fn find_year_index(tokens: &[&str]) -> Option<usize> {
    tokens.iter().position(|t| {
        t.len() == 4
            && t.chars().all(|c| c.is_ascii_digit())
            && t.parse::<u32>()
                .is_ok_and(|y| (YEAR_MIN..=YEAR_MAX).contains(&y))
    })
}

/// An adjacent `et`, `al` pair anywhere in the author tokens marks an
/// et-al filename (`smith-et-al-…`, `smith-jones-et-al-…`).
fn has_et_al(tokens: &[&str]) -> bool {
    tokens
        .windows(2)
        .any(|pair| pair[0].eq_ignore_ascii_case("et") && pair[1].eq_ignore_ascii_case("al"))
}

fn join_title_cased(tokens: &[&str]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| title_case(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_et_al_collapse() {
        let authors = extract_authors("smith-jones-et-al-2019-drug-stability-analysis.pdf");
        assert_eq!(authors, vec!["Smith"]);
        assert_eq!(
            extract_authors("smith-et-al-2020-intro.pdf"),
            vec!["Smith"]
        );
    }

    #[test]
    fn test_multiple_authors_capped_at_three() {
        let authors = extract_authors("smith-jones-lee-park-2015-methods.pdf");
        assert_eq!(authors, vec!["Smith", "Jones", "Lee"]);
    }

    #[test]
    fn test_title_after_year() {
        let title = extract_title("smith-jones-et-al-2019-drug-stability-analysis.pdf");
        assert_eq!(title, "Drug Stability Analysis");
    }

    #[test]
    fn test_no_year_token_falls_back() {
        assert_eq!(extract_authors("report.pdf"), vec!["Report"]);
        assert_eq!(extract_title("report.pdf"), "Report");
        assert_eq!(
            extract_title("annual-report.pdf"),
            "Annual Report"
        );
    }

    #[test]
    fn test_year_outside_range_is_ignored() {
        // 1850 is below the year window, so it reads as an ordinary token.
        assert_eq!(
            extract_title("census-1850-data.pdf"),
            "Census 1850 Data"
        );
    }

    #[test]
    fn test_year_with_no_title_tokens() {
        // Nothing after the year: fall back to the whole stem.
        assert_eq!(extract_title("smith-2019.pdf"), "Smith 2019");
        assert_eq!(extract_authors("smith-2019.pdf"), vec!["Smith"]);
    }

    #[test]
    fn test_degenerate_names_never_panic() {
        assert_eq!(extract_authors(""), Vec::<String>::new());
        assert_eq!(extract_title(""), "");
        assert_eq!(extract_authors(".pdf"), Vec::<String>::new());
        assert_eq!(extract_title(".pdf"), ".pdf");
    }
}
