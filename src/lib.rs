//! # pdf2tex
//!
//! Heuristic reconstruction of LaTeX source from extracted PDF content.
//!
//! PDF extraction itself happens outside this crate. pdf2tex reads the
//! extracted pages (a JSON document dump or `pdftotext`-style plain text),
//! decides line by line what is a heading, a formula or prose, rebuilds
//! equations split across lines, strips the title block that moved into the
//! preamble, and emits a complete LaTeX document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf2tex::{load_file, render};
//!
//! fn main() -> pdf2tex::Result<()> {
//!     // Load extracted content
//!     let doc = load_file("paper.txt")?;
//!
//!     // Convert to LaTeX
//!     let options = render::RenderOptions::default();
//!     let latex = render::to_latex(&doc, &options);
//!     println!("{}", latex);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Math detection**: rule tables with named verdicts, word-boundary safe
//! - **Equation reconstruction**: split fractions and exponents, `align` groups
//! - **Metadata promotion**: title/author/date moved into the preamble and
//!   removed from the first page
//! - **Parallel processing**: Uses Rayon for multi-page documents

pub mod classify;
pub mod detect;
pub mod error;
pub mod metadata;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use classify::{classify_line, convert_to_latex, is_likely_math, MathDecision};
pub use detect::{detect_format_from_bytes, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use metadata::{format_date, remove_metadata_from_text, MetadataExtractor};
pub use model::{ContentBlock, Document, ImageDescriptor, Metadata, Page};
pub use render::{
    escape_latex, ConversionStats, JsonFormat, PageSelection, RenderOptions, RenderResult,
    Template,
};
pub use source::{load_bytes, load_file, ExtractionBackend, JsonBackend, TextBackend};

use std::path::Path;

/// Convert a loaded document to LaTeX with default options.
///
/// # Example
///
/// ```
/// use pdf2tex::{to_latex, Document, Page};
///
/// let mut doc = Document::new();
/// doc.add_page(Page::new(1, "E = mc²"));
/// let latex = to_latex(&doc);
/// assert!(latex.contains(r"\[E = mc^{2}\]"));
/// ```
pub fn to_latex(doc: &Document) -> String {
    render::to_latex(doc, &RenderOptions::default())
}

/// Convert a loaded document to LaTeX with custom options.
pub fn to_latex_with_options(doc: &Document, options: &RenderOptions) -> String {
    render::to_latex(doc, options)
}

/// Load an extracted file and convert it to LaTeX.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::convert_file;
///
/// let latex = convert_file("paper.txt").unwrap();
/// std::fs::write("paper.tex", latex).unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<String> {
    convert_file_with_options(path, &RenderOptions::default())
}

/// Load an extracted file and convert it with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::{convert_file_with_options, RenderOptions, Template};
///
/// let options = RenderOptions::new()
///     .with_template(Template::Report)
///     .with_metadata_detection(true);
/// let latex = convert_file_with_options("paper.json", &options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = load_file(path)?;
    check_page_selection(&doc, &options.page_selection)?;
    Ok(render::to_latex(&doc, options))
}

/// Load an extracted file and convert it without blocking the runtime.
#[cfg(feature = "async")]
pub async fn convert_file_async<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    let mut doc = load_bytes(&data)?;
    if doc.source_name.is_none() {
        doc.source_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    check_page_selection(&doc, &options.page_selection)?;
    Ok(render::to_latex(&doc, options))
}

/// Reject selections naming pages past the end of the document.
fn check_page_selection(doc: &Document, selection: &PageSelection) -> Result<()> {
    match selection.max_page() {
        Some(max) if max > doc.page_count() => Err(Error::PageOutOfRange(max, doc.page_count())),
        _ => Ok(()),
    }
}

/// Builder for loading and converting extracted documents.
///
/// # Example
///
/// ```no_run
/// use pdf2tex::{Pdf2Tex, Template};
///
/// let latex = Pdf2Tex::new()
///     .with_template(Template::Report)
///     .with_images(false)
///     .detect_metadata()
///     .load("paper.txt")?
///     .to_latex();
/// # Ok::<(), pdf2tex::Error>(())
/// ```
pub struct Pdf2Tex {
    render_options: RenderOptions,
}

impl Pdf2Tex {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
        }
    }

    /// Set the document template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.render_options = self.render_options.with_template(template);
        self
    }

    /// Emit figures for page images.
    pub fn with_images(mut self, preserve: bool) -> Self {
        self.render_options = self.render_options.with_images(preserve);
        self
    }

    /// Set the path prefix for figure files.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Detect title, author, date and structure from the content.
    pub fn detect_metadata(mut self) -> Self {
        self.render_options = self.render_options.with_metadata_detection(true);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.render_options = self.render_options.with_parallel(false);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Load an extracted file and return a result wrapper.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<Pdf2TexResult> {
        let document = load_file(path)?;
        self.wrap(document)
    }

    /// Load extracted content from bytes.
    pub fn load_bytes(self, data: &[u8]) -> Result<Pdf2TexResult> {
        let document = load_bytes(data)?;
        self.wrap(document)
    }

    fn wrap(self, document: Document) -> Result<Pdf2TexResult> {
        check_page_selection(&document, &self.render_options.page_selection)?;
        Ok(Pdf2TexResult {
            document,
            render_options: self.render_options,
        })
    }
}

impl Default for Pdf2Tex {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded document together with the options to render it.
pub struct Pdf2TexResult {
    /// The loaded document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl Pdf2TexResult {
    /// Convert to LaTeX.
    pub fn to_latex(&self) -> String {
        render::to_latex(&self.document, &self.render_options)
    }

    /// Convert to LaTeX, keeping the metadata used and statistics.
    pub fn to_latex_with_stats(&self) -> RenderResult {
        render::to_latex_with_stats(&self.document, &self.render_options)
    }

    /// Dump the loaded document as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text of all pages.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
