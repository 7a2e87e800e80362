//! Exact, case-insensitive term search with a context preview around each hit.
//!
//! There is no index: every call scans the text it is given.

use super::error::DocError;
use super::extract::DocumentReader;
use super::schema::{SearchMatch, SearchResult};
use std::path::Path;

/// Characters of context kept on each side of a match.
pub const DEFAULT_CONTEXT_WINDOW: usize = 50;

/// Find every non-overlapping occurrence of `term` in `content`.
///
/// Offsets are character offsets. After a hit at `[start, end)` scanning
/// resumes at `end`, so `"aa"` in `"aaa"` is found once.
pub fn search(content: &str, term: &str, window: usize) -> Result<Vec<SearchMatch>, DocError> {
    if term.trim().is_empty() {
        return Err(DocError::EmptyTerm);
    }

    let original: Vec<char> = content.chars().collect();
    let haystack: Vec<char> = original.iter().copied().map(fold).collect();
    let needle: Vec<char> = term.chars().map(fold).collect();

    let mut matches = Vec::new();
    let mut pos = 0;
    while pos + needle.len() <= haystack.len() {
        if haystack[pos..pos + needle.len()] != needle[..] {
            pos += 1;
            continue;
        }
        let end = pos + needle.len();
        let before = pos.saturating_sub(window);
        let after = end.saturating_add(window).min(original.len());
        matches.push(SearchMatch {
            start: pos,
            end,
            matched_text: original[pos..end].iter().collect(),
            context: original[before..after].iter().collect(),
        });
        pos = end;
    }

    Ok(matches)
}

/// Decode `path` and search it. A decode failure is passed through without
/// searching.
pub fn search_in_file(
    reader: &DocumentReader,
    path: &Path,
    term: &str,
    window: usize,
) -> SearchResult {
    let read = reader.decode(path);
    if let Some(error) = read.error {
        return SearchResult {
            matches: Vec::new(),
            metadata: read.metadata,
            error: Some(error),
        };
    }

    let content = read.content.unwrap_or_default();
    match search(&content, term, window) {
        Ok(matches) => SearchResult {
            matches,
            metadata: read.metadata,
            error: None,
        },
        Err(e) => SearchResult {
            matches: Vec::new(),
            metadata: read.metadata,
            error: Some(e),
        },
    }
}

// Simple case folding that keeps one char per char, so offsets in the folded
// text line up with the original.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn overlapping_occurrences_are_reported_once() {
        let matches = search("aaa", "aa", DEFAULT_CONTEXT_WINDOW).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (0, 2));
    }

    #[test]
    fn blank_terms_are_rejected() {
        assert_eq!(search("anything", "", 10), Err(DocError::EmptyTerm));
        assert_eq!(search("anything", "   \t", 10), Err(DocError::EmptyTerm));
    }

    #[test]
    fn absent_term_is_empty_not_error() {
        assert!(search("Rust and Go", "python", 10).unwrap().is_empty());
    }

    #[test]
    fn matching_ignores_case_but_keeps_original_text() {
        let content = "Python, PYTHON and python.";
        let matches = search(content, "PyThOn", 0).unwrap();

        let found: Vec<_> = matches.iter().map(|m| m.matched_text.as_str()).collect();
        assert_eq!(found, vec!["Python", "PYTHON", "python"]);
        assert!(matches.windows(2).all(|w| w[0].end <= w[1].start));
        assert!(matches.iter().all(|m| m.end - m.start == "python".len()));
    }

    #[test]
    fn context_is_clamped_to_content_bounds() {
        let content = "xx rust yy";
        let m = &search(content, "rust", 5).unwrap()[0];
        assert_eq!(m.start, 3);
        assert_eq!(m.context, "xx rust yy");

        let m = &search(content, "rust", 1).unwrap()[0];
        assert_eq!(m.context, " rust ");
    }

    #[test]
    fn huge_window_takes_whole_content() {
        let matches = search("abc", "b", usize::MAX).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].context, "abc");
    }

    #[test]
    fn offsets_count_characters() {
        let content = "Zoë knows C++ and c++";
        let matches = search(content, "C++", 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].start, 10);
        assert_eq!(matches[0].context, "s C++ a");
        assert_eq!(matches[1].matched_text, "c++");
    }

    #[test]
    fn file_search_decodes_then_searches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cv.txt");
        fs::write(&path, "Experienced in Rust. Rust everywhere.").unwrap();

        let result = search_in_file(&DocumentReader::new(), &path, "rust", 5);
        assert!(result.error.is_none());
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.metadata.unwrap().name, "cv.txt");
    }

    #[test]
    fn file_search_propagates_decode_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.txt");
        let result = search_in_file(&DocumentReader::new(), &missing, "rust", 5);

        assert!(result.matches.is_empty());
        assert!(matches!(result.error, Some(DocError::NotFound(_))));
    }
}
