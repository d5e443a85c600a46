//! Final document composition: preamble, title section and body.

use super::assemble::ContentAssembler;
use super::escape::{escape_latex, escape_prose_line};
use super::options::RenderOptions;
use super::result::RenderResult;
use crate::metadata::{format_date, MetadataExtractor};
use crate::model::{Document, Metadata};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ABSTRACT_MARKER: Regex = Regex::new(
        r"(?im)^[ \t]*(?:abstract|summary)\b[ \t]*[:.\-]?[ \t]*|\b(?:abstract|summary):[ \t]*"
    )
    .unwrap();
    static ref ABSTRACT_END: Regex = Regex::new(
        r"(?i)\n[ \t]*\n|\n[ \t]*(?:\d+\.?[ \t]*)?(?:introduction|keywords|index terms)\b"
    )
    .unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

const PACKAGES: [&str; 6] = [
    r"\usepackage[utf8]{inputenc}",
    r"\usepackage[T1]{fontenc}",
    r"\usepackage[margin=1in]{geometry}",
    r"\usepackage{graphicx}",
    r"\usepackage{amsmath}",
    r"\usepackage{amsfonts}",
];

const UNTITLED: &str = "Untitled Document";
const MAX_ABSTRACT_CHARS: usize = 1000;
const MIN_ABSTRACT_CHARS: usize = 50;

/// Builds the complete LaTeX source for a document.
pub struct DocumentComposer<'o> {
    options: &'o RenderOptions,
}

impl<'o> DocumentComposer<'o> {
    /// Create a composer with the given options.
    pub fn new(options: &'o RenderOptions) -> Self {
        Self { options }
    }

    /// Compose `doc` into LaTeX.
    ///
    /// When metadata detection is enabled the document's metadata is
    /// enriched first; the same metadata drives both the preamble and the
    /// first-page filter.
    pub fn compose(&self, doc: &Document) -> RenderResult {
        let metadata = if self.options.detect_metadata {
            MetadataExtractor::new().enrich(doc)
        } else {
            doc.metadata.clone()
        };

        let assembler = ContentAssembler::new(self.options, &metadata);
        let (body, stats) = assembler.assemble_document(doc, self.options);

        let source_name = self
            .options
            .source_name
            .as_deref()
            .or(doc.source_name.as_deref());
        let preamble = self.preamble(&metadata, source_name);
        let title_section = self.title_section(&metadata, doc.first_page_text());

        let content = [preamble, title_section, body]
            .into_iter()
            .filter(|part| !part.is_empty())
            .chain(std::iter::once(r"\end{document}".to_string()))
            .collect::<Vec<_>>()
            .join("\n\n");

        log::info!(
            "Generated LaTeX document ({} characters, {} pages)",
            content.len(),
            stats.page_count
        );
        RenderResult::new(content, metadata, stats)
    }

    /// Document class, packages, `\title`/`\author`/`\date` and `\begin{document}`.
    pub fn preamble(&self, metadata: &Metadata, source_name: Option<&str>) -> String {
        let mut lines = vec![format!(
            "\\documentclass{{{}}}",
            self.options.template.document_class()
        )];
        lines.extend(PACKAGES.iter().map(|p| p.to_string()));
        if self.options.preserve_images {
            lines.push(r"\usepackage{float}".to_string());
        }

        lines.push(format!("\\title{{{}}}", resolve_title(metadata, source_name)));

        if let Some(author) = metadata.author() {
            lines.push(format!("\\author{{{}}}", escape_latex(author)));
        }

        let date = metadata.date().map(format_date).unwrap_or_default();
        if date.is_empty() {
            lines.push(r"\date{\today}".to_string());
        } else {
            lines.push(format!("\\date{{{}}}", escape_latex(&date)));
        }

        lines.push(r"\begin{document}".to_string());
        lines.join("\n")
    }

    /// `\maketitle`, followed by the abstract when one is flagged and found.
    pub fn title_section(&self, metadata: &Metadata, first_page: &str) -> String {
        let mut section = r"\maketitle".to_string();
        if metadata.has_abstract() {
            if let Some(text) = extract_abstract(first_page) {
                section.push_str(&format!(
                    "\n\n\\begin{{abstract}}\n{}\n\\end{{abstract}}",
                    escape_prose_line(&text)
                ));
            }
        }
        section
    }
}

/// Convert a document to LaTeX.
pub fn to_latex(doc: &Document, options: &RenderOptions) -> String {
    DocumentComposer::new(options).compose(doc).content
}

/// Convert a document to LaTeX, returning metadata and statistics as well.
pub fn to_latex_with_stats(doc: &Document, options: &RenderOptions) -> RenderResult {
    DocumentComposer::new(options).compose(doc)
}

/// Escaped title: metadata title, then source name, then a placeholder.
fn resolve_title(metadata: &Metadata, source_name: Option<&str>) -> String {
    let title = metadata
        .title()
        .or_else(|| source_name.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(UNTITLED);
    escape_latex(title)
}

/// Abstract text following an `Abstract`/`Summary` marker.
///
/// Ends at the first blank line or an Introduction/Keywords heading, is cut
/// to 1000 characters, and is discarded when shorter than 50.
pub fn extract_abstract(text: &str) -> Option<String> {
    let marker = ABSTRACT_MARKER.find(text)?;
    let rest = text[marker.end()..].trim_start();
    let body = match ABSTRACT_END.find(rest) {
        Some(end) => &rest[..end.start()],
        None => rest,
    };

    let collapsed = WHITESPACE_RUN.replace_all(body.trim(), " ");
    let abstract_text: String = collapsed.chars().take(MAX_ABSTRACT_CHARS).collect();
    if abstract_text.chars().count() < MIN_ABSTRACT_CHARS {
        log::debug!("Discarding short abstract ({} chars)", abstract_text.len());
        return None;
    }
    Some(abstract_text)
}
