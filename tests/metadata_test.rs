//! Integration tests for metadata detection, filtering and date formatting.

use pdf2tex::metadata::{find_date, PromotedMetadata};
use pdf2tex::model::DocumentKind;
use pdf2tex::{format_date, remove_metadata_from_text, Document, MetadataExtractor, Page};

fn document(pages: &[&str]) -> Document {
    let mut doc = Document::new();
    for (i, text) in pages.iter().enumerate() {
        doc.add_page(Page::new(i as u32 + 1, *text));
    }
    doc
}

// ==================== Date formatting ====================

#[test]
fn test_format_date_shapes() {
    assert_eq!(format_date("2024-01-15"), "15/01/2024");
    assert_eq!(format_date("D:20231105093000+01'00'"), "05/11/2023");
    assert_eq!(format_date("October 13, 2025"), "October 13, 2025");
    assert_eq!(format_date("12/05/2024"), "12/05/2024");
    assert_eq!(format_date("March 2024"), "March 2024");
    assert_eq!(format_date("sometime around 1999 or so"), "1999");
    assert_eq!(format_date(""), "");
}

#[test]
fn test_format_date_invalid_iso_falls_back_to_year() {
    assert_eq!(format_date("2024-13-45"), "2024");
}

#[test]
fn test_find_date_prefers_specific_shapes() {
    assert_eq!(
        find_date("Updated in March 2024, released October 13, 2025"),
        Some("October 13, 2025")
    );
    assert_eq!(find_date("no dates here"), None);
}

// ==================== Filtering ====================

#[test]
fn test_filter_single_line_run() {
    let promoted = PromotedMetadata::new("Hello World", "Anant Kumar", "October 13, 2025");
    let text = "Hello World Anant Kumar October 13, 2025 Hello world! This is a test document.";

    assert_eq!(
        remove_metadata_from_text(text, &promoted),
        "Hello world! This is a test document."
    );
}

#[test]
fn test_filter_reformatted_date() {
    let promoted = PromotedMetadata::new("Hello World", "Anant Kumar", "2025-10-13");
    let text = "Hello World Anant Kumar October 13, 2025 Body starts here.";

    assert_eq!(remove_metadata_from_text(text, &promoted), "Body starts here.");
}

#[test]
fn test_filter_multi_line() {
    let promoted = PromotedMetadata::new("Deep Learning", "Jane Smith", "May 2023");
    let text = "Deep Learning for Tables\nJane Smith, MIT\n\nMay 2023\n\nWe present a method.\nJane Smith proposed it first in a much longer sentence that keeps going well past the author line length limit.";

    let filtered = remove_metadata_from_text(text, &promoted);
    assert!(filtered.starts_with("We present a method."));
    assert!(filtered.contains("Jane Smith proposed it first"));
}

#[test]
fn test_filter_is_idempotent_without_metadata() {
    let promoted = PromotedMetadata::new("", "", "");
    let text = "Title\nBody";
    assert_eq!(remove_metadata_from_text(text, &promoted), text);
    assert_eq!(remove_metadata_from_text("   ", &promoted), "");
}

// ==================== Enrichment ====================

#[test]
fn test_enrich_academic_paper() {
    let doc = document(&[
        "Machine Learning in Medical Diagnosis: A Revolutionary Approach\n\nBy Dr. Sarah Johnson and Prof. Michael Chen\nStanford University Medical School\n\nPublished: March 2024\n\nAbstract\nThis study looks at diagnosis.",
        "Introduction\nBody.\n\nConclusion\nDone.\n\nReferences\n[1] A paper.",
    ]);
    let metadata = MetadataExtractor::new().enrich(&doc);

    assert_eq!(
        metadata.title(),
        Some("Machine Learning in Medical Diagnosis: A Revolutionary Approach")
    );
    assert!(metadata.author().unwrap().contains("Dr. Sarah Johnson"));
    assert_eq!(metadata.date(), Some("March 2024"));

    let structure = metadata.structure.unwrap();
    assert!(structure.has_abstract);
    assert!(structure.has_introduction);
    assert!(structure.has_conclusion);
    assert!(structure.has_references);
    assert_eq!(structure.estimated_kind(2_000), DocumentKind::AcademicPaper);
}

#[test]
fn test_enrich_honorific_author() {
    let doc = document(&["Quantum Effects in Small Devices\nDr. Emily Watson\n\nThe body text begins here."]);
    let metadata = MetadataExtractor::new().enrich(&doc);

    assert_eq!(metadata.title(), Some("Quantum Effects in Small Devices"));
    assert_eq!(metadata.author(), Some("Dr. Emily Watson"));
    assert_eq!(metadata.date(), None);
}

#[test]
fn test_enrich_keeps_existing_author() {
    let mut doc = document(&["Some Title Here\nBy Maria Garcia\n\nText."]);
    doc.metadata.author = Some("Original Author".to_string());
    let metadata = MetadataExtractor::new().enrich(&doc);

    assert_eq!(metadata.author(), Some("Original Author"));
}
