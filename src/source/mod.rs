//! Extraction backend abstraction layer.
//!
//! PDF byte extraction happens outside this crate. A backend turns the
//! output of an external extractor into a [`Document`]; the rest of the
//! pipeline never sees the raw input.

mod json;
mod text;

pub use json::JsonBackend;
pub use text::TextBackend;

use crate::detect::{detect_format_from_bytes, InputFormat};
use crate::error::{Error, Result};
use crate::model::Document;
use std::path::Path;

/// Abstract interface for reading extracted document content.
pub trait ExtractionBackend: Send + Sync {
    /// Backend name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Build a document from raw input bytes.
    fn extract(&self, data: &[u8]) -> Result<Document>;
}

/// Backend for a detected input format.
pub fn backend_for(format: InputFormat) -> Result<Box<dyn ExtractionBackend>> {
    match format {
        InputFormat::Json => Ok(Box::new(JsonBackend)),
        InputFormat::Text => Ok(Box::new(TextBackend)),
        InputFormat::Pdf => {
            log::warn!("Raw PDF input; run an extractor (e.g. pdftotext) first");
            Err(Error::UnsupportedFormat(
                "raw PDF input needs an external text extractor".to_string(),
            ))
        }
    }
}

/// Load a document from bytes, detecting the input format.
pub fn load_bytes(data: &[u8]) -> Result<Document> {
    let format = detect_format_from_bytes(data)?;
    let backend = backend_for(format)?;
    log::debug!("Loading {} bytes with {} backend", data.len(), backend.name());
    backend.extract(data)
}

/// Load a document from a file, detecting the input format.
///
/// The file stem is recorded as the document's source name unless the
/// input already carried one.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mut document = load_bytes(&data)?;

    if document.source_name.is_none() {
        document.source_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }

    log::info!(
        "Loaded {} ({} pages)",
        path.display(),
        document.page_count()
    );
    Ok(document)
}
