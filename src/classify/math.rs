//! Math line detection and notation conversion.
//!
//! Detection is an ordered rule cascade evaluated short-circuit:
//!
//! 1. hard exclusions (numeric idioms that only look mathematical)
//! 2. strong indicators (these override prose density)
//! 3. prose density
//! 4. shape indicators (powers, numeric ratios, device notation)
//! 5. weak indicators on short lines
//!
//! Conversion is a fixed sequence of pattern rules grouped by
//! [`FragmentKind`]. Each rule sees the output of the previous one, so a
//! single call may touch several categories. This is a textual transform,
//! not a parser.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Category of a math conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Superscript,
    Subscript,
    Fraction,
    SquareRoot,
    Operator,
    NamedFunction,
    GreekLetter,
    EquationReconstruction,
}

impl FragmentKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Superscript => "superscript",
            FragmentKind::Subscript => "subscript",
            FragmentKind::Fraction => "fraction",
            FragmentKind::SquareRoot => "square_root",
            FragmentKind::Operator => "operator",
            FragmentKind::NamedFunction => "named_function",
            FragmentKind::GreekLetter => "greek_letter",
            FragmentKind::EquationReconstruction => "equation_reconstruction",
        }
    }
}

/// One rewrite performed during conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathFragment {
    /// Text as matched
    pub original: String,
    /// Replacement LaTeX
    pub latex: String,
    /// Rule category
    pub kind: FragmentKind,
}

/// A math fragment found inside an otherwise plain line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMath {
    /// Byte range of the fragment in the scanned line
    pub span: Range<usize>,
    pub fragment: MathFragment,
}

/// Which rule of the detection cascade decided a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDecision {
    /// Empty or whitespace-only input
    Blank,
    /// A hard exclusion matched
    Excluded(&'static str),
    /// A strong indicator matched
    Strong(&'static str),
    /// The line reads as English prose
    Prose,
    /// A shape indicator matched on a line that is not prose
    Shape(&'static str),
    /// Short line with an arithmetic operator and no long words
    Weak,
    /// Nothing matched
    NoIndicator,
}

impl MathDecision {
    /// Whether the decision classifies the line as math.
    pub fn is_math(self) -> bool {
        matches!(
            self,
            MathDecision::Strong(_) | MathDecision::Shape(_) | MathDecision::Weak
        )
    }
}

struct LineRule {
    name: &'static str,
    pattern: Regex,
}

impl LineRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

enum Rewrite {
    Template(&'static str),
    Map(fn(&Captures) -> String),
}

struct ConversionRule {
    kind: FragmentKind,
    pattern: Regex,
    rewrite: Rewrite,
}

impl ConversionRule {
    fn template(kind: FragmentKind, pattern: &str, template: &'static str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            rewrite: Rewrite::Template(template),
        }
    }

    fn map(kind: FragmentKind, pattern: &str, f: fn(&Captures) -> String) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            rewrite: Rewrite::Map(f),
        }
    }

    fn render(&self, caps: &Captures) -> String {
        match &self.rewrite {
            Rewrite::Template(template) => {
                let mut dst = String::new();
                caps.expand(template, &mut dst);
                dst
            }
            Rewrite::Map(f) => f(caps),
        }
    }

    fn apply(&self, text: &str, fragments: &mut Vec<MathFragment>) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let replacement = self.render(&caps);
            out.push_str(&text[last..whole.start()]);
            if replacement != whole.as_str() {
                fragments.push(MathFragment {
                    original: whole.as_str().to_string(),
                    latex: replacement.clone(),
                    kind: self.kind,
                });
            }
            out.push_str(&replacement);
            last = whole.end();
        }

        out.push_str(&text[last..]);
        out
    }
}

const STOP_WORDS: &[&str] = &[
    "the", "and", "in", "for", "with", "is", "are", "of", "to", "on", "at", "or", "was", "were",
    "this", "that", "by", "from", "as", "be", "an",
];

const SUPERSCRIPT_CHARS: &str = "⁰¹²³⁴⁵⁶⁷⁸⁹⁺⁻⁼⁽⁾ⁿⁱ";
const SUBSCRIPT_CHARS: &str = "₀₁₂₃₄₅₆₇₈₉₊₋₌₍₎ₐₑₒₓₕₖₗₘₙₚₛₜ";
const OPERATOR_CHARS: &str = "±∓×÷≤≥≠≈∞∑∏∫∂∇∆→←";

lazy_static! {
    // Matched against the lowercased line.
    static ref EXCLUSIONS: Vec<LineRule> = vec![
        LineRule::new(
            "percentage",
            r"\d+(?:\.\d+)?\s*%\s*(?:response|increase|decrease|rate|growth|change|reduction|improvement)",
        ),
        LineRule::new("p_value", r"\bp\s*[<>≤≥=]\s*0?\.\d+"),
        LineRule::new("complexity", r"\bo\s*\([^)]*\)\s*time"),
        LineRule::new(
            "cross_reference",
            r"\b(?:section|chapter|version|figure|fig\.|table|page|eq\.|equation)\s+\d+(?:\.\d+)*",
        ),
        LineRule::new("numeric_date", r"^\s*\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\s*$"),
        LineRule::new("iso_date", r"^\s*\d{4}[/-]\d{1,2}[/-]\d{1,2}\s*$"),
    ];

    static ref STRONG_INDICATORS: Vec<LineRule> = vec![
        LineRule::new("calculus_symbol", r"[∑∏∫∂∇]"),
        LineRule::new("root_of_group", r"√\s*\("),
        LineRule::new("named_function", r"\b(?:sin|cos|tan|log|ln|exp)\s*\("),
        LineRule::new("latex_command", r"\\(?:frac|sqrt|int|sum|prod)\b"),
        LineRule::new(
            "assignment_with_operator",
            r"\b[A-Za-z][A-Za-z0-9]?\s*=\s*[A-Za-z0-9.^²³]+\s*[-+*/×÷]",
        ),
        LineRule::new("comparison", r"[≤≥≠≈∞]"),
        LineRule::new("braced_script", r"[\^_]\{[^}]*\}"),
    ];

    // Checked only after prose density.
    static ref SHAPE_INDICATORS: Vec<LineRule> = vec![
        LineRule::new("caret_power", r"[A-Za-z]\^\d+\s*[-+=]"),
        LineRule::new("numeric_fraction", r"\d+/\d+\s*[-+*=]"),
        LineRule::new("device_coefficient", r"\d+[µμ][a-z]+[A-Z][a-z]*"),
        LineRule::new("squared_difference", r"\([A-Z]{2,}\s*-\s*[A-Z][a-z]+\)\d"),
    ];

    static ref WEAK_OPERATOR: Regex =
        Regex::new(r"[A-Za-z0-9)\]²³]\s*[=+*/^<>×÷]\s*[A-Za-z0-9(√\-]|\s-\s").unwrap();
    static ref LONG_WORD: Regex = Regex::new(r"\p{Alphabetic}{5,}").unwrap();
    static ref LOWERCASE_RUN: Regex = Regex::new(r"\b[a-z]+\s+[a-z]+\s+[a-z]+\b").unwrap();
    static ref MATH_SPECIAL: Regex = Regex::new(r"\\?[%#&]").unwrap();

    static ref CONVERSION_RULES: Vec<ConversionRule> = vec![
        // Superscripts
        ConversionRule::template(
            FragmentKind::Superscript,
            r"([A-Za-z0-9)\]])\^([A-Za-z0-9+\-]+)",
            r"${1}^{${2}}",
        ),
        ConversionRule::map(FragmentKind::Superscript, r"[⁰¹²³⁴⁵⁶⁷⁸⁹⁺⁻⁼⁽⁾ⁿⁱ]+", |caps| {
            format!("^{{{}}}", map_chars(&caps[0], superscript_base))
        }),
        ConversionRule::template(FragmentKind::Superscript, r"\)(\d)\b", r")^{${1}}"),
        // Subscripts, restricted to identifier shapes seen in device equations
        ConversionRule::template(
            FragmentKind::Subscript,
            r"[µμ]([a-z])([A-Z])([a-z]+)",
            r"\mu_{${1}} ${2}_{${3}}",
        ),
        ConversionRule::template(
            FragmentKind::Subscript,
            r"([A-Za-z])_([A-Za-z0-9+\-]+)",
            r"${1}_{${2}}",
        ),
        ConversionRule::map(FragmentKind::Subscript, r"[₀₁₂₃₄₅₆₇₈₉₊₋₌₍₎ₐₑₒₓₕₖₗₘₙₚₛₜ]+", |caps| {
            format!("_{{{}}}", map_chars(&caps[0], subscript_base))
        }),
        ConversionRule::template(FragmentKind::Subscript, r"\bI([DSG])\b", r"I_{${1}}"),
        ConversionRule::template(
            FragmentKind::Subscript,
            r"\b([VIRCP])(th|ox|max|min|ref|eq|dd|ss|in|out|GS|DS|DD|SS|TH|BE|CE|CC|EE)\b",
            r"${1}_{${2}}",
        ),
        // Fractions
        ConversionRule::template(FragmentKind::Fraction, r"(\d+)/(\d+)", r"\frac{${1}}{${2}}"),
        ConversionRule::template(
            FragmentKind::Fraction,
            r"\(([^()]+)\)/\(([^()]+)\)",
            r"\frac{${1}}{${2}}",
        ),
        ConversionRule::template(
            FragmentKind::Fraction,
            r"\b([A-Za-z])/([A-Za-z])\b",
            r"\frac{${1}}{${2}}",
        ),
        // Square roots
        ConversionRule::template(FragmentKind::SquareRoot, r"√\(([^)]+)\)", r"\sqrt{${1}}"),
        ConversionRule::template(FragmentKind::SquareRoot, r"√([A-Za-z0-9]+)", r"\sqrt{${1}}"),
        // Operators
        ConversionRule::map(FragmentKind::Operator, r"([±∓×÷≤≥≠≈∞∑∏∫∂∇∆→←])([A-Za-z]?)", |caps| {
            let symbol = caps[1].chars().next().and_then(operator_macro);
            join_macro(symbol.unwrap_or_default(), &caps[2])
        }),
        // Named functions
        ConversionRule::template(
            FragmentKind::NamedFunction,
            r"(^|[^\\A-Za-z])(sin|cos|tan|log|ln|exp)\s*\(",
            r"${1}\${2}(",
        ),
        // Closed-form expressions, after scripts are braced
        ConversionRule::template(
            FragmentKind::EquationReconstruction,
            r"\bE\s*=\s*mc\^\{2\}",
            "E = mc^{2}",
        ),
        ConversionRule::template(
            FragmentKind::EquationReconstruction,
            r"\ba\^\{2\}\s*\+\s*b\^\{2\}\s*=\s*c\^\{2\}",
            "a^{2} + b^{2} = c^{2}",
        ),
        // Greek letters
        ConversionRule::map(FragmentKind::GreekLetter, r"([α-ωΑ-Ωµϑϕϖϵϱ])([A-Za-z]?)", |caps| {
            let letter = caps[1].chars().next().and_then(greek_macro);
            join_macro(letter.unwrap_or_default(), &caps[2])
        }),
    ];

    static ref RECONSTRUCTION_RULES: Vec<ConversionRule> = vec![
        // "= 1" then "2µnCox" on the next line: a halved coefficient
        ConversionRule::template(
            FragmentKind::EquationReconstruction,
            r"(=\s*)(\d+)\s+(\d+)\s*(\\?[A-Za-zµμ(])",
            r"${1}\frac{${2}}{${3}}${4}",
        ),
        // "W L (" ratio written as two stacked capitals
        ConversionRule::template(
            FragmentKind::EquationReconstruction,
            r"\b([A-Z])\s+([A-Z])\s*\(",
            r"\frac{${1}}{${2}}(",
        ),
        // exponent dropped onto its own token after a group
        ConversionRule::template(
            FragmentKind::EquationReconstruction,
            r"\)\s+(\d)\s*$",
            r")^{${1}}",
        ),
    ];

    static ref INLINE_FRAGMENT: Regex = Regex::new(&format!(
        "([{}]+)|([{}]+)|([α-ωΑ-Ωϑϕϖϵϱ])|([{}])",
        SUPERSCRIPT_CHARS, SUBSCRIPT_CHARS, OPERATOR_CHARS
    ))
    .unwrap();
}

/// Run the detection cascade and report which rule decided.
pub fn classify_line(line: &str) -> MathDecision {
    let line = line.trim();
    if line.is_empty() {
        return MathDecision::Blank;
    }

    let lower = line.to_lowercase();
    if let Some(rule) = EXCLUSIONS.iter().find(|r| r.pattern.is_match(&lower)) {
        return MathDecision::Excluded(rule.name);
    }

    if let Some(rule) = STRONG_INDICATORS.iter().find(|r| r.pattern.is_match(line)) {
        return MathDecision::Strong(rule.name);
    }

    if is_prose(line, &lower) {
        return MathDecision::Prose;
    }

    if let Some(rule) = SHAPE_INDICATORS.iter().find(|r| r.pattern.is_match(line)) {
        return MathDecision::Shape(rule.name);
    }

    if line.chars().count() < 20 && WEAK_OPERATOR.is_match(line) && !LONG_WORD.is_match(line) {
        return MathDecision::Weak;
    }

    MathDecision::NoIndicator
}

/// Whether a line most likely holds mathematical notation.
///
/// Conservative: prose wrongly wrapped in math mode is worse than a missed
/// equation left as text.
pub fn is_likely_math(line: &str) -> bool {
    classify_line(line).is_math()
}

fn is_prose(line: &str, lower: &str) -> bool {
    let stop_words = lower
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|token| STOP_WORDS.contains(token))
        .count();

    stop_words >= 2 || (line.chars().count() > 80 && LOWERCASE_RUN.is_match(line))
}

/// Convert recognised math notation in `text` to LaTeX math syntax.
///
/// Whitespace-only input yields an empty string.
pub fn convert_to_latex(text: &str) -> String {
    convert_with_fragments(text).0
}

/// Like [`convert_to_latex`], also returning every rewrite performed.
pub fn convert_with_fragments(text: &str) -> (String, Vec<MathFragment>) {
    let text = text.trim();
    let mut fragments = Vec::new();
    if text.is_empty() {
        return (String::new(), fragments);
    }

    let converted = CONVERSION_RULES
        .iter()
        .fold(escape_math_specials(text), |acc, rule| rule.apply(&acc, &mut fragments));
    (converted, fragments)
}

/// Escape `%`, `#` and `&`, which stay special inside math mode.
fn escape_math_specials(text: &str) -> String {
    MATH_SPECIAL
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            if matched.starts_with('\\') {
                matched.to_string()
            } else {
                format!("\\{}", matched)
            }
        })
        .into_owned()
}

/// Repair equations split across extracted lines.
///
/// Targets a halved coefficient whose denominator landed on the next line,
/// a width/length ratio written as two bare capitals, and an exponent
/// separated from its group. Input that matches none is returned unchanged.
pub fn reconstruct_equation(text: &str) -> String {
    reconstruct_with_fragments(text).0
}

/// Like [`reconstruct_equation`], also returning every rewrite performed.
pub fn reconstruct_with_fragments(text: &str) -> (String, Vec<MathFragment>) {
    let text = text.trim();
    let mut fragments = Vec::new();
    if text.is_empty() {
        return (String::new(), fragments);
    }

    let rebuilt = RECONSTRUCTION_RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc, &mut fragments));
    (rebuilt, fragments)
}

/// Find Unicode math fragments inside a plain-text line.
///
/// Spans are byte ranges into `line`, sorted and non-overlapping.
pub fn inline_fragments(line: &str) -> Vec<InlineMath> {
    INLINE_FRAGMENT
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (latex, kind) = if let Some(run) = caps.get(1) {
                (
                    format!("^{{{}}}", map_chars(run.as_str(), superscript_base)),
                    FragmentKind::Superscript,
                )
            } else if let Some(run) = caps.get(2) {
                (
                    format!("_{{{}}}", map_chars(run.as_str(), subscript_base)),
                    FragmentKind::Subscript,
                )
            } else if let Some(letter) = caps.get(3) {
                let c = letter.as_str().chars().next()?;
                (greek_macro(c)?.to_string(), FragmentKind::GreekLetter)
            } else {
                let c = caps.get(4)?.as_str().chars().next()?;
                (operator_macro(c)?.to_string(), FragmentKind::Operator)
            };

            Some(InlineMath {
                span: whole.range(),
                fragment: MathFragment {
                    original: whole.as_str().to_string(),
                    latex,
                    kind,
                },
            })
        })
        .collect()
}

fn map_chars(run: &str, f: fn(char) -> Option<char>) -> String {
    run.chars().map(|c| f(c).unwrap_or(c)).collect()
}

fn join_macro(latex: &str, next: &str) -> String {
    let needs_space = !next.is_empty()
        && latex.starts_with('\\')
        && latex.ends_with(|c: char| c.is_ascii_alphabetic());
    if needs_space {
        format!("{} {}", latex, next)
    } else {
        format!("{}{}", latex, next)
    }
}

fn superscript_base(c: char) -> Option<char> {
    let base = match c {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        '⁺' => '+',
        '⁻' => '-',
        '⁼' => '=',
        '⁽' => '(',
        '⁾' => ')',
        'ⁿ' => 'n',
        'ⁱ' => 'i',
        _ => return None,
    };
    Some(base)
}

fn subscript_base(c: char) -> Option<char> {
    let base = match c {
        '₀' => '0',
        '₁' => '1',
        '₂' => '2',
        '₃' => '3',
        '₄' => '4',
        '₅' => '5',
        '₆' => '6',
        '₇' => '7',
        '₈' => '8',
        '₉' => '9',
        '₊' => '+',
        '₋' => '-',
        '₌' => '=',
        '₍' => '(',
        '₎' => ')',
        'ₐ' => 'a',
        'ₑ' => 'e',
        'ₒ' => 'o',
        'ₓ' => 'x',
        'ₕ' => 'h',
        'ₖ' => 'k',
        'ₗ' => 'l',
        'ₘ' => 'm',
        'ₙ' => 'n',
        'ₚ' => 'p',
        'ₛ' => 's',
        'ₜ' => 't',
        _ => return None,
    };
    Some(base)
}

/// LaTeX macro for a Unicode operator symbol.
pub fn operator_macro(c: char) -> Option<&'static str> {
    let latex = match c {
        '±' => r"\pm",
        '∓' => r"\mp",
        '×' => r"\times",
        '÷' => r"\div",
        '≤' => r"\leq",
        '≥' => r"\geq",
        '≠' => r"\neq",
        '≈' => r"\approx",
        '∞' => r"\infty",
        '∑' => r"\sum",
        '∏' => r"\prod",
        '∫' => r"\int",
        '∂' => r"\partial",
        '∇' => r"\nabla",
        '∆' => r"\Delta",
        '→' => r"\rightarrow",
        '←' => r"\leftarrow",
        _ => return None,
    };
    Some(latex)
}

/// LaTeX for a Greek letter.
///
/// Both `μ` (U+03BC) and `µ` (U+00B5) map to `\mu`. Capitals that look
/// like Latin letters have no macro and become upright Latin capitals.
pub fn greek_macro(c: char) -> Option<&'static str> {
    let latex = match c {
        'α' => r"\alpha",
        'β' => r"\beta",
        'γ' => r"\gamma",
        'δ' => r"\delta",
        'ε' | 'ϵ' => r"\epsilon",
        'ζ' => r"\zeta",
        'η' => r"\eta",
        'θ' => r"\theta",
        'ϑ' => r"\vartheta",
        'ι' => r"\iota",
        'κ' => r"\kappa",
        'λ' => r"\lambda",
        'μ' | 'µ' => r"\mu",
        'ν' => r"\nu",
        'ξ' => r"\xi",
        'ο' => "o",
        'π' => r"\pi",
        'ϖ' => r"\varpi",
        'ρ' => r"\rho",
        'ϱ' => r"\varrho",
        'ς' => r"\varsigma",
        'σ' => r"\sigma",
        'τ' => r"\tau",
        'υ' => r"\upsilon",
        'φ' | 'ϕ' => r"\phi",
        'χ' => r"\chi",
        'ψ' => r"\psi",
        'ω' => r"\omega",
        'Α' => r"\mathrm{A}",
        'Β' => r"\mathrm{B}",
        'Γ' => r"\Gamma",
        'Δ' => r"\Delta",
        'Ε' => r"\mathrm{E}",
        'Ζ' => r"\mathrm{Z}",
        'Η' => r"\mathrm{H}",
        'Θ' => r"\Theta",
        'Ι' => r"\mathrm{I}",
        'Κ' => r"\mathrm{K}",
        'Λ' => r"\Lambda",
        'Μ' => r"\mathrm{M}",
        'Ν' => r"\mathrm{N}",
        'Ξ' => r"\Xi",
        'Ο' => r"\mathrm{O}",
        'Π' => r"\Pi",
        'Ρ' => r"\mathrm{P}",
        'Σ' => r"\Sigma",
        'Τ' => r"\mathrm{T}",
        'Υ' => r"\Upsilon",
        'Φ' => r"\Phi",
        'Χ' => r"\mathrm{X}",
        'Ψ' => r"\Psi",
        'Ω' => r"\Omega",
        _ => return None,
    };
    Some(latex)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Detection ====================

    #[test]
    fn test_exclusions_are_not_math() {
        for line in [
            "The survey showed a 85% response rate among participants.",
            "Statistical significance was found (p < 0.05) for the primary outcome.",
            "The algorithm processes data in O(n²) time complexity.",
            "See Chapter 3.4 for detailed analysis.",
            "15/01/2024",
        ] {
            assert!(!is_likely_math(line), "misclassified: {line}");
            assert!(matches!(classify_line(line), MathDecision::Excluded(_)));
        }
    }

    #[test]
    fn test_inclusions_are_math() {
        for line in ["E = mc²", "a² + b² = c²", "sin(x) = 0.5", "π ≈ 3.14159"] {
            assert!(is_likely_math(line), "missed: {line}");
        }
    }

    #[test]
    fn test_function_names_inside_words() {
        for line in [
            "using pdf2latex converter",
            "business logic implementation",
            "processing exponential data",
            "costuming and tangent lines in the blogging lunch",
        ] {
            assert!(!is_likely_math(line), "misclassified: {line}");
        }
    }

    #[test]
    fn test_strong_indicator_beats_prose() {
        let line = "The integral of the function is ∫ f(x) dx over the domain";
        assert_eq!(classify_line(line), MathDecision::Strong("calculus_symbol"));
    }

    #[test]
    fn test_prose_density() {
        assert_eq!(
            classify_line("This is the result of the study"),
            MathDecision::Prose
        );
    }

    #[test]
    fn test_shape_rules_yield_to_prose() {
        for line in [
            "About 3/4 - roughly the majority - of the users in the study were satisfied with it.",
            "The MOSFET (VGS - Threshold)2 notation is used in the rest of the chapter text.",
            "Raising x^2 + 1 to the limit is left as an exercise for the reader.",
        ] {
            assert_eq!(classify_line(line), MathDecision::Prose, "misclassified: {line}");
        }
        assert_eq!(
            classify_line("2µnCox W L (VGS -Vth)2"),
            MathDecision::Shape("device_coefficient")
        );
        assert_eq!(classify_line("x^2 = 4"), MathDecision::Shape("caret_power"));
    }

    #[test]
    fn test_device_equation_lines() {
        assert_eq!(classify_line("ID = 1"), MathDecision::Weak);
        assert!(is_likely_math("2µnCox W L (VGS -Vth)2"));
        assert!(!is_likely_math("(1)"));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(classify_line("   "), MathDecision::Blank);
        assert!(!is_likely_math(""));
    }

    // ==================== Conversion ====================

    #[test]
    fn test_convert_superscripts() {
        assert_eq!(convert_to_latex("E = mc²"), "E = mc^{2}");
        assert_eq!(convert_to_latex("a² + b² = c²"), "a^{2} + b^{2} = c^{2}");
        assert_eq!(convert_to_latex("x^2 + y^-1"), "x^{2} + y^{-1}");
    }

    #[test]
    fn test_convert_named_function_and_greek() {
        assert_eq!(convert_to_latex("sin(x) = 0.5"), r"\sin(x) = 0.5");
        assert_eq!(convert_to_latex("π ≈ 3.14159"), r"\pi \approx 3.14159");
        assert_eq!(convert_to_latex("2πr"), r"2\pi r");
        assert_eq!(convert_to_latex("µ + μ"), r"\mu + \mu");
    }

    #[test]
    fn test_convert_fractions_and_roots() {
        assert_eq!(convert_to_latex("x = 1/2"), r"x = \frac{1}{2}");
        assert_eq!(convert_to_latex("(a+b)/(c-d)"), r"\frac{a+b}{c-d}");
        assert_eq!(convert_to_latex("√(x+1)"), r"\sqrt{x+1}");
        assert_eq!(convert_to_latex("√2"), r"\sqrt{2}");
    }

    #[test]
    fn test_convert_device_subscripts() {
        assert_eq!(
            convert_to_latex("2µnCox W L (VGS -Vth)2"),
            r"2\mu_{n} C_{ox} W L (V_{GS} -V_{th})^{2}"
        );
        assert_eq!(convert_to_latex("ID = 1"), "I_{D} = 1");
    }

    #[test]
    fn test_convert_escapes_specials() {
        assert_eq!(convert_to_latex("y = 5% + 2"), r"y = 5\% + 2");
        assert_eq!(convert_to_latex("q = a & b # c"), r"q = a \& b \# c");
        assert_eq!(convert_to_latex(r"r = 3\% + 1"), r"r = 3\% + 1");
        assert!(convert_with_fragments("y = 5% + 2").1.is_empty());
    }

    #[test]
    fn test_convert_records_fragments() {
        let (latex, fragments) = convert_with_fragments("sin(θ) ≤ 1");
        assert_eq!(latex, r"\sin(\theta) \leq 1");
        let kinds: Vec<_> = fragments.iter().map(|f| f.kind).collect();
        assert!(kinds.contains(&FragmentKind::NamedFunction));
        assert!(kinds.contains(&FragmentKind::GreekLetter));
        assert!(kinds.contains(&FragmentKind::Operator));
    }

    #[test]
    fn test_convert_blank() {
        assert_eq!(convert_to_latex(" \t "), "");
    }

    #[test]
    fn test_greek_capitals_without_macros() {
        assert_eq!(convert_to_latex("Α + Ω"), r"\mathrm{A} + \Omega");
        assert_eq!(convert_to_latex("ο"), "o");
    }

    // ==================== Reconstruction ====================

    #[test]
    fn test_reconstruct_half_coefficient() {
        let joined = r"I_{D} = 1 2\mu_{n} C_{ox} W L (V_{GS} -V_{th})^{2}";
        assert_eq!(
            reconstruct_equation(joined),
            r"I_{D} = \frac{1}{2}\mu_{n} C_{ox} \frac{W}{L}(V_{GS} -V_{th})^{2}"
        );
    }

    #[test]
    fn test_reconstruct_trailing_exponent() {
        assert_eq!(reconstruct_equation("(a - b) 2"), "(a - b)^{2}");
    }

    #[test]
    fn test_reconstruct_leaves_unknown_shapes() {
        assert_eq!(reconstruct_equation("x = y + z"), "x = y + z");
    }

    // ==================== Inline fragments ====================

    #[test]
    fn test_inline_fragments_spans() {
        let line = "area in m² with α-helix";
        let found = inline_fragments(line);
        assert_eq!(found.len(), 2);
        assert_eq!(&line[found[0].span.clone()], "²");
        assert_eq!(found[0].fragment.latex, "^{2}");
        assert_eq!(found[1].fragment.latex, r"\alpha");
    }
}
