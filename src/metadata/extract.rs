//! Metadata enrichment from document text.
//!
//! Backends often deliver empty or useless info dictionaries. The extractor
//! fills in missing title, author and date from the first page and derives
//! structure flags from the whole text. A title or author already present
//! wins; a date printed on the first page replaces the stored one.

use super::date::DATE_SHAPES;
use crate::model::{Document, DocumentStructure, Metadata};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADER_FOOTER: Regex = Regex::new(r"page\s+\d+|^\d+$|^[ivxlc]+$").unwrap();
    static ref PROPER_CASE: Regex = Regex::new(r"^[A-Z][A-Za-z\s\-:]+$").unwrap();
    static ref YEAR_OR_EMAIL: Regex = Regex::new(r"\d{4}|\w+@\w+").unwrap();
    static ref BY_LINE: Regex = Regex::new(r"(?i)^(?:(?:written\s+)?by[:,]?|authors?:)\s+(.+)$").unwrap();
    static ref HONORIFIC_NAME: Regex = Regex::new(
        r"(?i)^(?:Dr\.?|Prof\.?|Professor)\s+[A-Z][a-zA-Z.]+(?:\s+[A-Z][a-zA-Z.]+)+\s*$"
    )
    .unwrap();
    static ref PLAIN_NAME: Regex =
        Regex::new(r"^[A-Z][a-zA-Z.]+(?:\s+[A-Z][a-zA-Z.]+){1,3}\s*$").unwrap();
    static ref NAME_FORBIDDEN: Regex = Regex::new(r"[0-9@#$%^&*(){}\[\]|\\<>+=]").unwrap();
    static ref PREFIXED_YEAR: Regex =
        Regex::new(r"(?i)(?:©|\(c\)|copyright|published|created|updated):?\s*(\d{4})").unwrap();
    static ref YEAR: Regex = Regex::new(r"\d{4}").unwrap();

    /// "Title Words Firstname Lastname <date> ..." on a single line.
    static ref RUN_ON_HEADER: Regex = Regex::new(&format!(
        r"^(?P<title>[A-Z][A-Za-z\-:]*(?:\s+[A-Za-z\-:]+)*?)\s+(?P<author>[A-Z][a-z]+\s+[A-Z][a-z]+)\s+(?P<date>{}|{})",
        DATE_SHAPES[0].as_str().trim_start_matches("(?i)"),
        DATE_SHAPES[1].as_str()
    ))
    .unwrap();

    static ref STRUCTURE_KEYWORDS: [Regex; 4] = [
        Regex::new(r"(?i)\babstract\b").unwrap(),
        Regex::new(r"(?i)\b(?:introduction|overview)\b").unwrap(),
        Regex::new(r"(?i)\b(?:conclusion|summary|final)\b").unwrap(),
        Regex::new(r"(?i)\b(?:references|bibliography|works cited)\b").unwrap(),
    ];
}

const NON_NAME_WORDS: &[&str] = &[
    "university",
    "institute",
    "department",
    "college",
    "abstract",
    "introduction",
];

const TITLE_WORDS: &[&str] = &[
    ":",
    "analysis",
    "study",
    "research",
    "review",
    "approach",
    "method",
    "impact",
    "effect",
    "application",
    "system",
    "development",
];

const TITLE_SCAN_LINES: usize = 10;
const MIN_TITLE_CHARS: usize = 3;
const DATE_SCAN_CHARS: usize = 1000;

/// Fills missing metadata from document text.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Return `document.metadata` with missing fields filled in.
    ///
    /// A date printed on the first page replaces any existing date.
    pub fn enrich(&self, document: &Document) -> Metadata {
        let mut metadata = document.metadata.clone();
        let first_page = document.first_page_text().trim();

        if !first_page.is_empty() && !first_page.contains('\n') {
            if let Some(caps) = RUN_ON_HEADER.captures(first_page) {
                fill(&mut metadata.title, caps["title"].trim());
                fill(&mut metadata.author, caps["author"].trim());
                fill(&mut metadata.date, caps["date"].trim());
            }
        }

        if metadata.title().map_or(true, |t| t.chars().count() < MIN_TITLE_CHARS) {
            if let Some(title) = self.detect_title(first_page) {
                log::info!("Detected title: {}", title);
                metadata.title = Some(title);
            }
        }
        if metadata.author().is_none() {
            if let Some(author) = self.detect_author(first_page) {
                log::info!("Detected author: {}", author);
                metadata.author = Some(author);
            }
        }
        // Info-dictionary dates are usually file stamps; a printed date wins.
        if let Some(date) = self.detect_date(document) {
            log::info!("Detected date: {}", date);
            metadata.date = Some(date);
        }
        if metadata.structure.is_none() {
            metadata.structure = Some(self.analyze_structure(&document.plain_text()));
        }

        log::debug!(
            "Enriched metadata: title={:?} author={:?} date={:?}",
            metadata.title,
            metadata.author,
            metadata.date
        );
        metadata
    }

    /// Highest-scoring title candidate among the first lines of the page.
    pub fn detect_title(&self, first_page: &str) -> Option<String> {
        let mut best: Option<(i32, &str)> = None;

        for (i, line) in first_page.lines().take(TITLE_SCAN_LINES).enumerate() {
            let line = line.trim();
            let len = line.chars().count();
            if len < 5 || HEADER_FOOTER.is_match(&line.to_lowercase()) {
                continue;
            }

            let mut score = 0;
            if (10..=80).contains(&len) {
                score += 3;
            } else if len > 80 {
                score -= 2;
            }
            score += match i {
                0..=2 => 3,
                3..=5 => 1,
                _ => 0,
            };
            if PROPER_CASE.is_match(line) {
                score += 2;
            }
            if line.matches(':').count() == 1 {
                score += 2;
            }
            let all_caps =
                line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase);
            if all_caps && len > 15 {
                score += 1;
            }
            if !YEAR_OR_EMAIL.is_match(line) {
                score += 1;
            }

            if score >= 4 && best.map_or(true, |(s, _)| score > s) {
                best = Some((score, line));
            }
        }

        best.map(|(_, line)| line.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// Author from a "By ..." line or a name-shaped line under the title.
    pub fn detect_author(&self, first_page: &str) -> Option<String> {
        let lines: Vec<&str> = first_page.lines().map(str::trim).collect();

        for line in lines.iter().take(TITLE_SCAN_LINES) {
            if let Some(caps) = BY_LINE.captures(line) {
                let candidate = caps[1].trim();
                if is_valid_author_name(candidate) {
                    return Some(candidate.to_string());
                }
            }
        }

        lines
            .iter()
            .skip(1)
            .take(7)
            .filter(|line| line.chars().count() >= 5 && line.chars().count() <= 60)
            .find(|line| {
                let shaped = HONORIFIC_NAME.is_match(line)
                    || (PLAIN_NAME.is_match(line) && !looks_like_title(line));
                shaped && is_valid_author_name(line)
            })
            .map(|line| line.to_string())
    }

    /// Most complete date on the first page or near the start of the document.
    pub fn detect_date(&self, document: &Document) -> Option<String> {
        let head: String = document.plain_text().chars().take(DATE_SCAN_CHARS).collect();
        let haystack = format!("{}\n\n{}", document.first_page_text(), head);

        let mut candidates: Vec<&str> = DATE_SHAPES
            .iter()
            .flat_map(|re| re.find_iter(&haystack).map(|m| m.as_str()))
            .chain(PREFIXED_YEAR.captures_iter(&haystack).filter_map(|c| c.get(1)).map(|m| m.as_str()))
            .filter(|d| is_valid_date(d))
            .collect();

        // Longest first; stable sort keeps shape order among equals.
        candidates.sort_by(|a, b| b.len().cmp(&a.len()));
        candidates.first().map(|d| d.to_string())
    }

    /// Structure flags from section keywords anywhere in the text.
    pub fn analyze_structure(&self, text: &str) -> DocumentStructure {
        let [abstract_, introduction, conclusion, references] = &*STRUCTURE_KEYWORDS;
        DocumentStructure {
            has_abstract: abstract_.is_match(text),
            has_introduction: introduction.is_match(text),
            has_conclusion: conclusion.is_match(text),
            has_references: references.is_match(text),
        }
    }
}

fn fill(slot: &mut Option<String>, value: &str) {
    let missing = slot.as_deref().map_or(true, |v| v.trim().is_empty());
    if missing && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

fn is_valid_author_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(3..=100).contains(&len) {
        return false;
    }

    let lower = name.to_lowercase();
    let has_title = ["dr.", "prof.", "professor"]
        .iter()
        .any(|prefix| lower.starts_with(prefix));
    if !name.contains(' ') && !has_title {
        return false;
    }
    if NAME_FORBIDDEN.is_match(name) {
        return false;
    }

    let has_lower = name.chars().any(char::is_lowercase);
    let has_upper = name.chars().any(char::is_uppercase);
    if !(has_lower && has_upper) && !has_title {
        return false;
    }

    !NON_NAME_WORDS.iter().any(|word| lower.contains(word))
}

fn looks_like_title(text: &str) -> bool {
    let lower = text.to_lowercase();
    TITLE_WORDS.iter().any(|word| lower.contains(word))
}

fn is_valid_date(date: &str) -> bool {
    if date.chars().count() < 4 {
        return false;
    }
    YEAR.find(date)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map_or(true, |year| (1900..=2100).contains(&year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    fn document(text: &str) -> Document {
        let mut doc = Document::new();
        doc.add_page(Page::new(1, text));
        doc
    }

    #[test]
    fn test_run_on_header() {
        let doc = document(
            "Hello World Anant Kumar October 13, 2025 Hello world! This is a test document.",
        );
        let metadata = MetadataExtractor::new().enrich(&doc);

        assert_eq!(metadata.title.as_deref(), Some("Hello World"));
        assert_eq!(metadata.author.as_deref(), Some("Anant Kumar"));
        assert_eq!(metadata.date.as_deref(), Some("October 13, 2025"));
    }

    #[test]
    fn test_existing_values_win() {
        let mut doc = document("Some Title Jane Smith 12/05/2024 body");
        doc.metadata.title = Some("Given Title".to_string());
        let metadata = MetadataExtractor::new().enrich(&doc);

        assert_eq!(metadata.title.as_deref(), Some("Given Title"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Smith"));
        assert_eq!(metadata.date.as_deref(), Some("12/05/2024"));
    }

    #[test]
    fn test_printed_date_replaces_stamp() {
        let mut doc = document("Report Title\nJane Smith\nMarch 3, 2024\n\nbody text");
        doc.metadata.title = Some("x".to_string());
        doc.metadata.date = Some("D:20240101120000".to_string());
        let metadata = MetadataExtractor::new().enrich(&doc);

        assert_eq!(metadata.title.as_deref(), Some("Report Title"));
        assert_eq!(metadata.date.as_deref(), Some("March 3, 2024"));
    }

    #[test]
    fn test_multi_line_first_page() {
        let doc = document(
            "Neural Approaches to Parsing\nJane Smith\nMarch 3, 2024\n\nAbstract\nWe study parsing.",
        );
        let metadata = MetadataExtractor::new().enrich(&doc);

        assert_eq!(metadata.title.as_deref(), Some("Neural Approaches to Parsing"));
        assert_eq!(metadata.author.as_deref(), Some("Jane Smith"));
        assert_eq!(metadata.date.as_deref(), Some("March 3, 2024"));
        assert!(metadata.has_abstract());
    }

    #[test]
    fn test_by_line_author() {
        let extractor = MetadataExtractor::new();
        assert_eq!(
            extractor.detect_author("A Title Here\nBy Maria Garcia\nSome text"),
            Some("Maria Garcia".to_string())
        );
        assert_eq!(
            extractor.detect_author("A Title Here\nAuthor: Li Wei\nSome text"),
            Some("Li Wei".to_string())
        );
    }

    #[test]
    fn test_author_validation() {
        assert!(is_valid_author_name("Jane Smith"));
        assert!(is_valid_author_name("Dr. House"));
        assert!(!is_valid_author_name("JANE SMITH"));
        assert!(!is_valid_author_name("Stanford University"));
        assert!(!is_valid_author_name("Room 101"));
    }

    #[test]
    fn test_analyze_structure() {
        let structure = MetadataExtractor::new()
            .analyze_structure("Abstract\n...\nIntroduction\n...\nReferences\n[1] x");
        assert!(structure.has_abstract);
        assert!(structure.has_introduction);
        assert!(!structure.has_conclusion);
        assert!(structure.has_references);
    }

    #[test]
    fn test_date_year_range() {
        let extractor = MetadataExtractor::new();
        assert_eq!(extractor.detect_date(&document("Copyright 1850")), None);
        assert_eq!(
            extractor.detect_date(&document("Published: 2021")),
            Some("2021".to_string())
        );
    }

    #[test]
    fn test_date_after_cover_page() {
        let mut doc = document("Annual Report");
        doc.add_page(Page::new(2, "Prepared for the board\nMarch 3, 2024\n\nSummary of results"));
        let metadata = MetadataExtractor::new().enrich(&doc);

        assert_eq!(metadata.date.as_deref(), Some("March 3, 2024"));
        assert_eq!(
            MetadataExtractor::new().detect_date(&doc),
            Some("March 3, 2024".to_string())
        );
    }

    #[test]
    fn test_empty_document() {
        let metadata = MetadataExtractor::new().enrich(&Document::new());
        assert!(metadata.title.is_none());
        assert!(metadata.author.is_none());
        assert!(metadata.date.is_none());
        assert_eq!(metadata.structure, Some(DocumentStructure::default()));
    }
}
