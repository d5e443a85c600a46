//! Plain-text backend for `pdftotext`-style output.

use super::ExtractionBackend;
use crate::error::Result;
use crate::model::{Document, Page};

const FORM_FEED: char = '\x0C';

/// Reads plain text with pages separated by form feeds.
///
/// Input that is not valid UTF-8 is decoded as Latin-1. A trailing empty
/// page after the final form feed is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl ExtractionBackend for TextBackend {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, data: &[u8]) -> Result<Document> {
        let text = decode_text(data);
        let mut pages: Vec<&str> = text.split(FORM_FEED).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }

        let mut document = Document::new();
        for (i, page_text) in pages.into_iter().enumerate() {
            document.add_page(Page::new(i as u32 + 1, page_text));
        }
        Ok(document)
    }
}

/// Decode bytes as UTF-8 (BOM stripped), falling back to Latin-1.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::debug!("Input is not UTF-8; decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_feed_pages() {
        let doc = TextBackend
            .extract(b"Title\nBody\x0cSecond page\x0c")
            .unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[0].text, "Title\nBody");
        assert_eq!(doc.pages[1].text, "Second page");
    }

    #[test]
    fn test_single_page() {
        let doc = TextBackend.extract(b"Only page").unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_empty_middle_page_kept() {
        let doc = TextBackend.extract(b"One\x0c\x0cThree").unwrap();
        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[1].is_empty());
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xE9 = 'é' in Latin-1
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
        assert_eq!(decode_text("µ".as_bytes()), "µ");
    }
}
