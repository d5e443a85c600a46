//! Removal of promoted metadata from body text.
//!
//! Title, author and date end up in the preamble; the first page usually
//! repeats them as its opening lines. Stripping them here keeps the body
//! from duplicating what `\maketitle` already prints.

use super::date::DATE_SHAPES;
use crate::model::Metadata;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Lines at least this long are never dropped for mentioning the author.
const AUTHOR_LINE_LIMIT: usize = 100;

/// Metadata values that have been promoted into the preamble.
///
/// Values are trimmed; an empty value disables its removal step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotedMetadata<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub date: &'a str,
}

impl<'a> PromotedMetadata<'a> {
    /// Create from explicit values.
    pub fn new(title: &'a str, author: &'a str, date: &'a str) -> Self {
        Self {
            title: title.trim(),
            author: author.trim(),
            date: date.trim(),
        }
    }

    /// Borrow the promotable fields of `metadata`.
    pub fn from_metadata(metadata: &'a Metadata) -> Self {
        Self::new(
            metadata.title().unwrap_or(""),
            metadata.author().unwrap_or(""),
            metadata.date().unwrap_or(""),
        )
    }

    /// Whether there is nothing to remove.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.date.is_empty()
    }
}

/// Strip promoted metadata from `text`.
///
/// Text without internal line breaks is treated as one run of
/// "Title Author Date Body": the title is cut from the start, then the
/// author from the new start, then the date (exact, or by shape). The order
/// matters because each cut shifts the start of the string.
///
/// Multi-line text is filtered line by line.
pub fn remove_metadata_from_text(text: &str, promoted: &PromotedMetadata<'_>) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    if promoted.is_empty() {
        return text.to_string();
    }

    if text.trim().contains('\n') {
        remove_from_lines(text, promoted)
    } else {
        remove_from_single_line(text.trim(), promoted)
    }
}

fn remove_from_single_line(text: &str, promoted: &PromotedMetadata<'_>) -> String {
    let mut rest = text.to_string();

    for prefix in [promoted.title, promoted.author] {
        if prefix.is_empty() {
            continue;
        }
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start().to_string();
        }
    }

    if !promoted.date.is_empty() {
        if let Some(pos) = rest.find(promoted.date) {
            rest.replace_range(pos..pos + promoted.date.len(), "");
        } else if let Some(range) = DATE_SHAPES
            .iter()
            .find_map(|re| re.find(&rest))
            .map(|m| m.range())
        {
            log::debug!("Removing reformatted date '{}'", &rest[range.clone()]);
            rest.replace_range(range, "");
        }
    }

    WHITESPACE_RUN
        .replace_all(&rest, " ")
        .trim_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}

fn remove_from_lines(text: &str, promoted: &PromotedMetadata<'_>) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if !promoted.title.is_empty() && trimmed.starts_with(promoted.title) {
            continue;
        }
        if !promoted.author.is_empty()
            && trimmed.chars().count() < AUTHOR_LINE_LIMIT
            && trimmed.contains(promoted.author)
        {
            continue;
        }
        if !promoted.date.is_empty() && trimmed.contains(promoted.date) {
            continue;
        }

        let blank = trimmed.is_empty();
        if blank && kept.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        kept.push(line);
    }

    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_title_author_date() {
        let promoted = PromotedMetadata::new("Hello World", "Anant Kumar", "October 13, 2025");
        let text = "Hello World Anant Kumar October 13, 2025 Hello world! This is a test document.";
        let result = remove_metadata_from_text(text, &promoted);

        assert_eq!(result, "Hello world! This is a test document.");
        for removed in ["Hello World", "Anant Kumar", "October", "2025"] {
            assert!(!result.contains(removed), "still contains {removed}");
        }
    }

    #[test]
    fn test_single_line_reformatted_date() {
        let promoted = PromotedMetadata::new("Report", "", "2025-10-13");
        let text = "Report 13/10/2025, Body starts here.";
        assert_eq!(remove_metadata_from_text(text, &promoted), "Body starts here.");
    }

    #[test]
    fn test_single_line_title_not_at_start() {
        let promoted = PromotedMetadata::new("Hello World", "", "");
        let text = "Greeting: Hello World";
        assert_eq!(remove_metadata_from_text(text, &promoted), text);
    }

    #[test]
    fn test_multi_line() {
        let promoted = PromotedMetadata::new("Deep Learning", "Jane Doe", "March 3, 2024");
        let text = "Deep Learning for Cats\n\nJane Doe, University of Somewhere\nMarch 3, 2024\n\n\nIntroduction\nCats are great.\n\n";
        assert_eq!(
            remove_metadata_from_text(text, &promoted),
            "Introduction\nCats are great."
        );
    }

    #[test]
    fn test_multi_line_keeps_long_author_mentions() {
        let promoted = PromotedMetadata::new("", "Jane Doe", "");
        let long_line = format!("As Jane Doe argued {}", "at considerable length ".repeat(5));
        let text = format!("Jane Doe\n{}", long_line);
        assert_eq!(remove_metadata_from_text(&text, &promoted), long_line);
    }

    #[test]
    fn test_collapses_blank_runs() {
        let promoted = PromotedMetadata::new("Title", "", "");
        let text = "Title\nfirst\n\n\n\nsecond";
        assert_eq!(remove_metadata_from_text(text, &promoted), "first\n\nsecond");
    }

    #[test]
    fn test_empty_values_are_noop() {
        let promoted = PromotedMetadata::default();
        let text = "Some\n\n\ntext";
        assert_eq!(remove_metadata_from_text(text, &promoted), text);
        assert_eq!(remove_metadata_from_text("   ", &promoted), "");
    }

    #[test]
    fn test_from_metadata_ignores_blank_values() {
        let metadata = Metadata {
            title: Some("  Paper ".to_string()),
            author: Some(" ".to_string()),
            ..Default::default()
        };
        let promoted = PromotedMetadata::from_metadata(&metadata);
        assert_eq!(promoted.title, "Paper");
        assert_eq!(promoted.author, "");
        assert_eq!(promoted.date, "");
    }
}
