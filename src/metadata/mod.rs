//! Document metadata handling.
//!
//! - [`filter`] removes promoted title/author/date from body text
//! - [`date`] normalizes dates for the preamble
//! - [`extract`] fills missing metadata from the text itself

pub mod date;
pub mod extract;
pub mod filter;

pub use date::{find_date, format_date};
pub use extract::MetadataExtractor;
pub use filter::{remove_metadata_from_text, PromotedMetadata};
