//! Heading detection for plain text lines.

use crate::model::ContentBlock;
use crate::render::escape::escape_prose_line;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBERED_HEADING: Regex = Regex::new(r"^\d+\.?\s+[A-Z]").unwrap();
    static ref NUMBERED_SUBHEADING: Regex = Regex::new(r"^\d+\.\d+\.?\s+[A-Z]").unwrap();
}

/// Structural role of a non-math line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Section,
    Subsection,
    Text,
}

/// Whether a line reads as a section heading.
///
/// At most 100 characters, and one of: all caps with at most 8 words,
/// title case with at most 6 words, or a `<number>. <Capital>` prefix.
pub fn looks_like_heading(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > 100 {
        return false;
    }

    let words = line.split_whitespace().count();
    (is_upper(line) && words <= 8)
        || (is_title_case(line) && words <= 6)
        || NUMBERED_HEADING.is_match(line)
}

/// Whether a line reads as a numbered subsection heading (`2.1 Methods`).
pub fn looks_like_subheading(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().count() <= 80 && NUMBERED_SUBHEADING.is_match(line)
}

/// Classify a line that is already known not to be math.
///
/// Subheadings are checked first; `2.1 Methods` is also title case.
pub fn classify_structure(line: &str) -> LineKind {
    if looks_like_subheading(line) {
        LineKind::Subsection
    } else if looks_like_heading(line) {
        LineKind::Section
    } else {
        LineKind::Text
    }
}

/// Build the content block for a non-math line.
///
/// Trailing periods are dropped from headings.
pub fn structure_block(line: &str) -> ContentBlock {
    match classify_structure(line) {
        LineKind::Section => ContentBlock::Section(heading_text(line)),
        LineKind::Subsection => ContentBlock::Subsection(heading_text(line)),
        LineKind::Text => ContentBlock::Text(escape_prose_line(line.trim())),
    }
}

fn heading_text(line: &str) -> String {
    let line = line.trim();
    let line = line.trim_end_matches('.').trim_end();
    escape_prose_line(line)
}

/// At least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Every cased run starts with an uppercase letter followed by lowercase ones.
fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}
