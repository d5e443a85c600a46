//! Rendering module for converting documents to LaTeX and JSON.

mod assemble;
mod compose;
pub mod escape;
mod json;
mod normalize;
mod options;
mod result;

pub use assemble::{ContentAssembler, PageContent, PAGE_SEPARATOR};
pub use compose::{extract_abstract, to_latex, to_latex_with_stats, DocumentComposer};
pub use escape::{escape_latex, escape_preserving_math, unescape_latex};
pub use json::{to_json, JsonFormat};
pub use normalize::{NormalizeOptions, TextNormalizer};
pub use options::{PageSelection, RenderOptions, Template};
pub use result::{ConversionStats, RenderResult};
