//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};

/// A document as supplied by an extraction backend.
///
/// Produced once by the backend and read-only to the conversion core;
/// only [`Metadata`] is replaced, once, by the enrichment step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, date, structure flags)
    #[serde(default)]
    pub metadata: Metadata,

    /// Pages in reading order
    #[serde(default)]
    pub pages: Vec<Page>,

    /// File stem of the source, used as fallback title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Set the source name (usually the input file stem).
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Raw text of the first page, or an empty string.
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map(|p| p.text.as_str()).unwrap_or("")
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .filter(|page| !page.text.is_empty())
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total number of image descriptors across all pages.
    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|p| p.images.len()).sum()
    }
}

/// Document metadata.
///
/// Values are plain strings, not yet LaTeX-escaped. Once promoted into the
/// preamble they must not reappear in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author(s)
    pub author: Option<String>,

    /// Document date, in whatever shape the source used
    pub date: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Section-level structure flags
    pub structure: Option<DocumentStructure>,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Title, if present and not blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(&self.title)
    }

    /// Author, if present and not blank.
    pub fn author(&self) -> Option<&str> {
        non_blank(&self.author)
    }

    /// Date, if present and not blank.
    pub fn date(&self) -> Option<&str> {
        non_blank(&self.date)
    }

    /// Whether structure analysis flagged an abstract.
    pub fn has_abstract(&self) -> bool {
        self.structure.as_ref().is_some_and(|s| s.has_abstract)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Coarse structural features found in the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStructure {
    /// An abstract section was found
    pub has_abstract: bool,

    /// An introduction or overview section was found
    pub has_introduction: bool,

    /// A conclusion or summary section was found
    pub has_conclusion: bool,

    /// A references or bibliography section was found
    pub has_references: bool,
}

impl DocumentStructure {
    /// Estimate what kind of document this is.
    ///
    /// `text_len` is the length of the full document text in bytes.
    pub fn estimated_kind(&self, text_len: usize) -> DocumentKind {
        if self.has_abstract && self.has_references {
            DocumentKind::AcademicPaper
        } else if self.has_introduction && self.has_conclusion {
            DocumentKind::Article
        } else if text_len > 10_000 {
            DocumentKind::Report
        } else {
            DocumentKind::Document
        }
    }
}

/// Estimated document kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Abstract and references present
    AcademicPaper,
    /// Introduction and conclusion present
    Article,
    /// Long document without the above markers
    Report,
    /// Anything else
    #[default]
    Document,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentKind::AcademicPaper => "academic paper",
            DocumentKind::Article => "article",
            DocumentKind::Report => "report",
            DocumentKind::Document => "document",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.first_page_text(), "");
    }

    #[test]
    fn test_get_page_is_one_indexed() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1, "first"));
        doc.add_page(Page::new(2, "second"));

        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.text.as_str()), Some("second"));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_blank_metadata_values_are_absent() {
        let metadata = Metadata {
            title: Some("  ".to_string()),
            author: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.title(), None);
        assert_eq!(metadata.author(), Some("Jane Doe"));
        assert_eq!(metadata.date(), None);
        assert!(!metadata.has_abstract());
    }

    #[test]
    fn test_estimated_kind() {
        let paper = DocumentStructure {
            has_abstract: true,
            has_references: true,
            ..Default::default()
        };
        assert_eq!(paper.estimated_kind(100), DocumentKind::AcademicPaper);

        let plain = DocumentStructure::default();
        assert_eq!(plain.estimated_kind(20_000), DocumentKind::Report);
        assert_eq!(plain.estimated_kind(200), DocumentKind::Document);
    }

    #[test]
    fn test_sparse_json_loads() {
        let doc: Document =
            serde_json::from_str(r#"{"pages":[{"number":1,"text":"Hi"}]}"#).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.metadata.title.is_none());
    }
}
