//! Document model types.
//!
//! These types are the boundary between an extraction backend and the
//! conversion core. A backend produces a [`Document`] of [`Page`]s; the
//! assembler turns page text into [`ContentBlock`]s.

mod block;
mod document;
mod page;

pub use block::ContentBlock;
pub use document::{Document, DocumentKind, DocumentStructure, Metadata};
pub use page::{ImageDescriptor, Page};
