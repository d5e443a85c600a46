//! Input format detection.
//!
//! The converter reads what an external extractor produced: a JSON dump of
//! a [`Document`](crate::model::Document) or plain text with form-feed page
//! breaks. Raw PDFs are recognized only so they can be rejected with a
//! useful message.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const HEADER_LEN: usize = 512;

/// Recognized input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Serialized document with pages, metadata and images
    Json,
    /// Plain text, pages separated by form feeds
    Text,
    /// An unextracted PDF file
    Pdf,
}

impl InputFormat {
    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Json => "json",
            InputFormat::Text => "text",
            InputFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the input format from a file path.
///
/// Only the first few hundred bytes are read.
///
/// # Example
/// ```no_run
/// use pdf2tex::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("paper.json").unwrap();
/// println!("Input format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    BufReader::new(file)
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the input format from the leading bytes of the input.
///
/// # Returns
/// * `Ok(InputFormat::Pdf)` for data starting with `%PDF-`
/// * `Ok(InputFormat::Json)` when the first non-whitespace byte is `{`
/// * `Ok(InputFormat::Text)` otherwise
/// * `Err(Error::UnknownFormat)` for empty or whitespace-only data
pub fn detect_format_from_bytes(data: &[u8]) -> Result<InputFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(InputFormat::Pdf);
    }

    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        None => Err(Error::UnknownFormat),
        Some(b'{') => Ok(InputFormat::Json),
        Some(_) => Ok(InputFormat::Text),
    }
}

/// Check if bytes look like an unextracted PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}
