//! Line classification.
//!
//! [`math`] decides whether a line is mathematical and converts its
//! notation; [`structure`] labels the remaining lines as headings or text.

pub mod math;
pub mod structure;

pub use math::{
    classify_line, convert_to_latex, convert_with_fragments, inline_fragments, is_likely_math,
    reconstruct_equation, FragmentKind, InlineMath, MathDecision, MathFragment,
};
pub use structure::{classify_structure, looks_like_heading, looks_like_subheading, LineKind};
