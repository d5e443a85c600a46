//! Error types for pdf2tex library.

use std::io;
use thiserror::Error;

/// Result type alias for pdf2tex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading extracted content or rendering it.
///
/// Classification and conversion never fail; only the I/O boundary
/// (loading documents, writing dumps) reports errors.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A JSON document dump could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is empty or not recognized.
    #[error("Unknown input format")]
    UnknownFormat,

    /// The input was recognized but no backend can read it.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The extraction backend could not produce a document.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Unknown document template name.
    #[error("Invalid template '{0}' (expected article, report or book)")]
    InvalidTemplate(String),

    /// Invalid page range string.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}
