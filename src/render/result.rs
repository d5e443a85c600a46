//! Conversion result with metadata and statistics.

use crate::model::{ContentBlock, Metadata};
use serde::{Deserialize, Serialize};

/// Result of converting a document, including LaTeX and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The LaTeX source
    pub content: String,

    /// Metadata the preamble was built from
    pub metadata: Metadata,

    /// Conversion statistics
    pub stats: ConversionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: ConversionStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while assembling body content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages selected for conversion
    pub page_count: u32,

    /// Selected pages that produced no content
    pub empty_page_count: u32,

    /// `\section` blocks
    pub section_count: u32,

    /// `\subsection` blocks
    pub subsection_count: u32,

    /// Plain text blocks
    pub text_block_count: u32,

    /// Numbered `equation` environments
    pub equation_count: u32,

    /// `align` environments
    pub align_count: u32,

    /// Single-line `\[...\]` blocks
    pub display_math_count: u32,

    /// Figure blocks
    pub figure_count: u32,

    /// Individual math rewrites (scripts, fractions, symbols, ...)
    pub math_fragment_count: u32,

    /// Approximate word count of the source text
    pub word_count: u32,

    /// Character count of the source text (excluding whitespace)
    pub char_count: u32,
}

impl ConversionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted block.
    pub fn add_block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Section(_) => self.section_count += 1,
            ContentBlock::Subsection(_) => self.subsection_count += 1,
            ContentBlock::Text(_) => self.text_block_count += 1,
            ContentBlock::DisplayMath(_) => self.display_math_count += 1,
            ContentBlock::Equation { .. } => self.equation_count += 1,
            ContentBlock::Align(_) => self.align_count += 1,
            ContentBlock::Figure { .. } => self.figure_count += 1,
        }
    }

    /// Count math rewrites.
    pub fn add_fragments(&mut self, count: usize) {
        self.math_fragment_count += count as u32;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Total math environments of any kind.
    pub fn math_block_count(&self) -> u32 {
        self.equation_count + self.align_count + self.display_math_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.page_count += other.page_count;
        self.empty_page_count += other.empty_page_count;
        self.section_count += other.section_count;
        self.subsection_count += other.subsection_count;
        self.text_block_count += other.text_block_count;
        self.equation_count += other.equation_count;
        self.align_count += other.align_count;
        self.display_math_count += other.display_math_count;
        self.figure_count += other.figure_count;
        self.math_fragment_count += other.math_fragment_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}
