//! Serialized document backend.

use super::ExtractionBackend;
use crate::error::{Error, Result};
use crate::model::Document;

/// Reads a JSON dump of a [`Document`].
///
/// Sparse dumps load: page text, images, sizes and every metadata field
/// are optional. Page numbers must start at 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl ExtractionBackend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, data: &[u8]) -> Result<Document> {
        let document: Document = serde_json::from_slice(data)?;

        if let Some(page) = document.pages.iter().find(|p| p.number == 0) {
            return Err(Error::Extraction(format!(
                "page numbers start at 1 (found page {})",
                page.number
            )));
        }

        let ordered = document
            .pages
            .windows(2)
            .all(|pair| pair[0].number < pair[1].number);
        if !ordered {
            log::warn!("Pages are not in ascending order; keeping input order");
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_document() {
        let data = br#"{
            "metadata": {"title": "Quantum Computing"},
            "pages": [
                {"number": 1, "text": "Intro"},
                {"number": 2, "images": [{"index": 1, "width": 300.0}]}
            ]
        }"#;

        let doc = JsonBackend.extract(data).unwrap();
        assert_eq!(doc.metadata.title(), Some("Quantum Computing"));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[1].text, "");
        assert_eq!(doc.pages[1].images.len(), 1);
        assert_eq!(doc.pages[1].width, 612.0);
    }

    #[test]
    fn test_page_zero_rejected() {
        let data = br#"{"pages": [{"number": 0, "text": "x"}]}"#;
        assert!(matches!(
            JsonBackend.extract(data),
            Err(Error::Extraction(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(JsonBackend.extract(b"{ not json"), Err(Error::Json(_))));
    }
}
