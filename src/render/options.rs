//! Rendering options and configuration.

use crate::error::{Error, Result};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Options for converting a document to LaTeX.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Document class to emit
    pub template: Template,

    /// Emit figure blocks for page images and load the `float` package
    pub preserve_images: bool,

    /// Prefix for image paths in `\includegraphics` (e.g., "images/")
    pub image_path_prefix: String,

    /// Page selection
    pub page_selection: PageSelection,

    /// Run the text normalizer over page text before classification
    pub normalize_text: bool,

    /// Fill missing metadata from the document text
    pub detect_metadata: bool,

    /// Assemble pages on the rayon thread pool
    pub parallel: bool,

    /// Fallback title source when metadata has no title
    pub source_name: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Enable or disable figure output.
    pub fn with_images(mut self, preserve: bool) -> Self {
        self.preserve_images = preserve;
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Enable or disable metadata detection from text.
    pub fn with_metadata_detection(mut self, detect: bool) -> Self {
        self.detect_metadata = detect;
        self
    }

    /// Enable or disable parallel page assembly.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the fallback title source (usually the input file stem).
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template: Template::Article,
            preserve_images: true,
            image_path_prefix: String::new(),
            page_selection: PageSelection::All,
            normalize_text: true,
            detect_metadata: false,
            parallel: true,
            source_name: None,
        }
    }
}

/// LaTeX document class.
///
/// Only the class line differs; every template loads the same packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    Article,
    Report,
    Book,
}

impl Template {
    /// Name used in `\documentclass{...}`.
    pub fn document_class(&self) -> &'static str {
        match self {
            Template::Article => "article",
            Template::Report => "report",
            Template::Book => "book",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document_class())
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Template::Article),
            "report" => Ok(Template::Report),
            "book" => Ok(Template::Book),
            _ => Err(Error::InvalidTemplate(s.to_string())),
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (parse_page(start, s)?, parse_page(end, s)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start, s)?, parse_page(end, s)?);
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part, s)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }

    /// Highest page number named by the selection, if bounded.
    pub fn max_page(&self) -> Option<u32> {
        match self {
            PageSelection::All => None,
            PageSelection::Range(range) => Some(*range.end()),
            PageSelection::Pages(pages) => pages.last().copied(),
        }
    }
}

fn parse_page(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(Error::InvalidPageRange(whole.to_string())),
    }
}
