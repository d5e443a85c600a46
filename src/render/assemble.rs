//! Body assembly: page text to ordered LaTeX content blocks.
//!
//! Each paragraph is scanned once, line by line. Math lines accumulate in
//! an equation group until an equation number `(n)` closes it as a labelled
//! `equation`, or an ordinary line (or the end of the paragraph) flushes it
//! as `\[...\]` or `align`. The environment cannot be chosen before the run
//! ends, which is why lines are buffered rather than emitted directly.

use super::normalize::TextNormalizer;
use super::options::RenderOptions;
use super::result::ConversionStats;
use crate::classify::math::{convert_with_fragments, is_likely_math, reconstruct_with_fragments};
use crate::classify::structure::structure_block;
use crate::metadata::filter::{remove_metadata_from_text, PromotedMetadata};
use crate::model::{ContentBlock, Document, ImageDescriptor, Metadata, Page};
use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n\s*\n").unwrap();
    static ref EQUATION_NUMBER: Regex = Regex::new(r"^\((\d+)\)$").unwrap();
}

/// Separator placed between consecutive non-empty pages.
pub const PAGE_SEPARATOR: &str = "\n\n\\newpage\n\n";

const BLOCK_SEPARATOR: &str = "\n\n";

/// Blocks produced for a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Blocks in reading order
    pub blocks: Vec<ContentBlock>,
    /// Statistics for this page
    pub stats: ConversionStats,
}

impl PageContent {
    /// Whether the page produced no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the page's blocks as LaTeX.
    pub fn to_latex(&self) -> String {
        self.blocks
            .iter()
            .map(ContentBlock::to_latex)
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }
}

/// Turns page text into LaTeX body content.
pub struct ContentAssembler<'a> {
    promoted: PromotedMetadata<'a>,
    normalizer: Option<TextNormalizer>,
    preserve_images: bool,
    image_path_prefix: String,
    parallel: bool,
}

impl<'a> ContentAssembler<'a> {
    /// Create an assembler for a document whose preamble uses `metadata`.
    pub fn new(options: &RenderOptions, metadata: &'a Metadata) -> Self {
        Self {
            promoted: PromotedMetadata::from_metadata(metadata),
            normalizer: options.normalize_text.then(TextNormalizer::default),
            preserve_images: options.preserve_images,
            image_path_prefix: options.image_path_prefix.clone(),
            parallel: options.parallel,
        }
    }

    /// Assemble the selected pages of `doc` into body LaTeX.
    ///
    /// Pages are concatenated in order with `\newpage` between non-empty
    /// pages. Only the document's first page is run through the metadata
    /// filter.
    pub fn assemble_document(
        &self,
        doc: &Document,
        options: &RenderOptions,
    ) -> (String, ConversionStats) {
        let selected: Vec<(usize, &Page)> = doc
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| options.page_selection.includes(page.number))
            .collect();

        let pages: Vec<PageContent> = if self.parallel && selected.len() > 1 {
            selected
                .par_iter()
                .map(|(index, page)| self.assemble_page(page, *index == 0))
                .collect()
        } else {
            selected
                .iter()
                .map(|(index, page)| self.assemble_page(page, *index == 0))
                .collect()
        };

        let mut stats = ConversionStats::new();
        let mut rendered = Vec::with_capacity(pages.len());
        for page in &pages {
            stats.merge(&page.stats);
            if page.is_empty() {
                log::debug!("Page {} produced no content", page.number);
            } else {
                rendered.push(page.to_latex());
            }
        }

        (rendered.join(PAGE_SEPARATOR), stats)
    }

    /// Assemble one page. `is_first` enables the metadata filter.
    pub fn assemble_page(&self, page: &Page, is_first: bool) -> PageContent {
        let mut stats = ConversionStats {
            page_count: 1,
            ..Default::default()
        };

        let raw: Cow<'_, str> = if is_first && !self.promoted.is_empty() {
            Cow::Owned(remove_metadata_from_text(&page.text, &self.promoted))
        } else {
            Cow::Borrowed(page.text.as_str())
        };
        let text = match &self.normalizer {
            Some(normalizer) => Cow::Owned(normalizer.normalize(&raw)),
            None => raw,
        };
        stats.count_text(&text);

        let mut blocks = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(&text) {
            blocks.extend(self.assemble_paragraph_into(paragraph, &mut stats));
        }

        if self.preserve_images {
            for image in &page.images {
                let block = self.figure_block(page, image);
                stats.add_block(&block);
                blocks.push(block);
            }
        }

        if blocks.is_empty() {
            stats.empty_page_count = 1;
        }

        PageContent {
            number: page.number,
            blocks,
            stats,
        }
    }

    /// Assemble a single paragraph.
    pub fn assemble_paragraph(&self, paragraph: &str) -> Vec<ContentBlock> {
        let mut stats = ConversionStats::new();
        self.assemble_paragraph_into(paragraph, &mut stats)
    }

    fn assemble_paragraph_into(
        &self,
        paragraph: &str,
        stats: &mut ConversionStats,
    ) -> Vec<ContentBlock> {
        let mut scanner = ParagraphScanner::new(stats);
        for line in paragraph.lines() {
            scanner.feed(line);
        }
        scanner.finish()
    }

    fn figure_block(&self, page: &Page, image: &ImageDescriptor) -> ContentBlock {
        ContentBlock::Figure {
            path: format!(
                "{}{}",
                self.image_path_prefix,
                image.file_name_or_default(page.number)
            ),
            width: image.width_ratio(page.width),
            caption: format!("Image from page {}", page.number),
            label: format!("fig:p{}_img{}", page.number, image.index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    Scanning,
    InEquation,
}

/// Converted math lines of the current run.
#[derive(Debug, Default)]
struct EquationGroup {
    lines: Vec<String>,
}

impl EquationGroup {
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

/// Single-pass scanner over one paragraph's lines.
struct ParagraphScanner<'s> {
    state: AssemblerState,
    group: EquationGroup,
    text: Vec<String>,
    blocks: Vec<ContentBlock>,
    stats: &'s mut ConversionStats,
}

impl<'s> ParagraphScanner<'s> {
    fn new(stats: &'s mut ConversionStats) -> Self {
        Self {
            state: AssemblerState::Scanning,
            group: EquationGroup::default(),
            text: Vec::new(),
            blocks: Vec::new(),
            stats,
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let number = EQUATION_NUMBER.captures(line).map(|caps| caps[1].to_string());
        match number {
            Some(label) if self.state == AssemblerState::InEquation => {
                self.close_group(label);
            }
            None if is_likely_math(line) => {
                self.flush_text();
                let (latex, fragments) = convert_with_fragments(line);
                self.stats.add_fragments(fragments.len());
                self.group.lines.push(latex);
                self.state = AssemblerState::InEquation;
            }
            _ => {
                self.flush_group();
                match structure_block(line) {
                    ContentBlock::Text(text) => self.text.push(text),
                    heading => {
                        self.flush_text();
                        self.push(heading);
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_group();
        self.flush_text();
        self.blocks
    }

    fn push(&mut self, block: ContentBlock) {
        self.stats.add_block(&block);
        self.blocks.push(block);
    }

    fn reconstruct(&mut self, text: &str) -> String {
        let (rebuilt, fragments) = reconstruct_with_fragments(text);
        self.stats.add_fragments(fragments.len());
        rebuilt
    }

    /// Close the group with an equation number.
    fn close_group(&mut self, label: String) {
        let lines = self.group.take();
        let content = self.reconstruct(&lines.join(" "));
        log::debug!(
            "Closing {}-line equation group as eq:{}",
            lines.len(),
            label
        );
        self.push(ContentBlock::Equation {
            content,
            label: Some(label),
        });
        self.state = AssemblerState::Scanning;
    }

    /// Emit an unlabelled group, if any.
    fn flush_group(&mut self) {
        if self.group.is_empty() {
            return;
        }

        let lines = self.group.take();
        let block = if lines.len() == 1 {
            ContentBlock::DisplayMath(self.reconstruct(&lines[0]))
        } else {
            let rows: Vec<String> = lines
                .iter()
                .flat_map(|line| line.split(r"\\"))
                .map(str::trim)
                .filter(|row| !row.is_empty())
                .map(str::to_string)
                .collect();
            let rows = rows.iter().map(|row| self.reconstruct(row)).collect();
            ContentBlock::Align(rows)
        };
        log::debug!("Flushing {}-line equation group", lines.len());
        self.push(block);
        self.state = AssemblerState::Scanning;
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text).join("\n");
        self.push(ContentBlock::Text(text));
    }
}
