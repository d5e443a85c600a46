//! LaTeX escaping.
//!
//! Math regions are protected by span rather than by placeholder strings:
//! the text between spans is escaped and the math is spliced back in.

use crate::classify::math::{inline_fragments, InlineMath};

/// Escape the LaTeX special characters `& % $ # ^ _ { } ~ \`.
///
/// Whitespace-only input yields an empty string.
pub fn escape_latex(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Inverse of [`escape_latex`].
pub fn unescape_latex(text: &str) -> String {
    const WORDS: [(&str, char); 3] = [
        (r"\textbackslash{}", '\\'),
        (r"\textasciicircum{}", '^'),
        (r"\textasciitilde{}", '~'),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    'outer: while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        for (word, c) in WORDS {
            if let Some(after) = rest.strip_prefix(word) {
                out.push(c);
                rest = after;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        chars.next();
        match chars.next() {
            Some(c @ ('&' | '%' | '$' | '#' | '_' | '{' | '}')) => {
                out.push(c);
                rest = &rest[2..];
            }
            _ => {
                out.push('\\');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escape `text`, splicing each math span back in as `$latex$`.
///
/// Spans must be byte ranges into `text`. Overlapping or invalid spans are
/// skipped and their text is escaped normally.
pub fn escape_preserving_math(text: &str, math: &[InlineMath]) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut spans: Vec<&InlineMath> = math.iter().collect();
    spans.sort_by_key(|m| m.span.start);

    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;

    for item in spans {
        let span = &item.span;
        let valid = span.start >= cursor
            && span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !valid {
            continue;
        }

        push_escaped(&mut out, &text[cursor..span.start]);
        out.push('$');
        out.push_str(&item.fragment.latex);
        out.push('$');
        cursor = span.end;
    }

    push_escaped(&mut out, &text[cursor..]);
    out
}

/// Escape a prose line, rendering Unicode math symbols in inline math.
pub fn escape_prose_line(line: &str) -> String {
    escape_preserving_math(line, &inline_fragments(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::math::{FragmentKind, MathFragment};

    fn inline(span: std::ops::Range<usize>, latex: &str) -> InlineMath {
        InlineMath {
            span,
            fragment: MathFragment {
                original: String::new(),
                latex: latex.to_string(),
                kind: FragmentKind::GreekLetter,
            },
        }
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape_latex("50% of R&D costs $5 #1"),
            r"50\% of R\&D costs \$5 \#1"
        );
        assert_eq!(escape_latex("a_b {c}"), r"a\_b \{c\}");
        assert_eq!(
            escape_latex(r"x^2 ~ C:\dir"),
            r"x\textasciicircum{}2 \textasciitilde{} C:\textbackslash{}dir"
        );
    }

    #[test]
    fn test_escape_blank() {
        assert_eq!(escape_latex(""), "");
        assert_eq!(escape_latex(" \n\t"), "");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let samples = [
            r"& % $ # ^ _ { } ~ \",
            r"\textbackslash{} typed literally",
            "plain text",
            r"trailing backslash \",
        ];
        for sample in samples {
            assert_eq!(unescape_latex(&escape_latex(sample)), sample);
        }
    }

    #[test]
    fn test_unescape_leaves_other_commands() {
        assert_eq!(unescape_latex(r"\emph{x} \%"), r"\emph{x} %");
    }

    #[test]
    fn test_escape_preserving_math() {
        let text = "cost α & β";
        let spans = [inline(5..7, r"\alpha"), inline(10..12, r"\beta")];
        assert_eq!(escape_preserving_math(text, &spans), r"cost $\alpha$ \& $\beta$");
    }

    #[test]
    fn test_escape_preserving_math_skips_bad_spans() {
        let text = "a_b";
        let spans = [inline(0..2, "x"), inline(1..3, "y"), inline(2..9, "z")];
        assert_eq!(escape_preserving_math(text, &spans), r"$x$b");
    }

    #[test]
    fn test_escape_prose_line() {
        assert_eq!(escape_prose_line("10 m² at 5% ± 1"), r"10 m$^{2}$ at 5\% $\pm$ 1");
    }
}
