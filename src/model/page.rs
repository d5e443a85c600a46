//! Page-level types.

use serde::{Deserialize, Serialize};

const LETTER_WIDTH: f32 = 612.0;
const LETTER_HEIGHT: f32 = 792.0;

fn default_width() -> f32 {
    LETTER_WIDTH
}

fn default_height() -> f32 {
    LETTER_HEIGHT
}

/// A single page of extracted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Raw extracted text, lines separated by `\n`
    #[serde(default)]
    pub text: String,

    /// Images found on the page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageDescriptor>,

    /// Page width in points (1 point = 1/72 inch)
    #[serde(default = "default_width")]
    pub width: f32,

    /// Page height in points
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Page {
    /// Create a Letter-sized page with the given text.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            images: Vec::new(),
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, String::new())
    }

    /// Set page dimensions in points.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Attach an image descriptor.
    pub fn with_image(mut self, image: ImageDescriptor) -> Self {
        self.images.push(image);
        self
    }

    /// Whether the page has neither text nor images.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.images.is_empty()
    }

    /// Number of non-blank text lines.
    pub fn line_count(&self) -> usize {
        self.text.lines().filter(|l| !l.trim().is_empty()).count()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// An image placed on a page.
///
/// Only the placement is described; image bytes are never handled here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDescriptor {
    /// Image index on the page (1-indexed)
    pub index: u32,

    /// Rendered width in points
    pub width: Option<f32>,

    /// Rendered height in points
    pub height: Option<f32>,

    /// File the image was (or will be) written to
    pub file_name: Option<String>,
}

impl ImageDescriptor {
    /// Create a descriptor for the image at `index` on its page.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Set the rendered width in points.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// File name to reference, defaulting to `image_p<page>_<index>`.
    pub fn file_name_or_default(&self, page_number: u32) -> String {
        match self.file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("image_p{}_{}", page_number, self.index),
        }
    }

    /// Width as a fraction of `page_width`, rounded to 0.05 and clamped
    /// to `[0.1, 1.0]`. Unknown widths give 0.8.
    pub fn width_ratio(&self, page_width: f32) -> f32 {
        match self.width {
            Some(w) if w > 0.0 && page_width > 0.0 => {
                let ratio = ((w / page_width) * 20.0).round() / 20.0;
                ratio.clamp(0.1, 1.0)
            }
            _ => 0.8,
        }
    }
}
