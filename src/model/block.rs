//! Content blocks produced by the assembler.

use serde::{Deserialize, Serialize};

/// A unit of LaTeX body content.
///
/// Text held by heading and paragraph variants is already escaped; math
/// variants hold converted LaTeX math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// `\section{...}`
    Section(String),

    /// `\subsection{...}`
    Subsection(String),

    /// Escaped prose, one or more lines
    Text(String),

    /// Single unnumbered display line `\[...\]`
    DisplayMath(String),

    /// Numbered equation, optionally labelled
    Equation {
        content: String,
        label: Option<String>,
    },

    /// Unnumbered multi-line group rendered as `align`
    Align(Vec<String>),

    /// Figure placeholder for an image descriptor
    Figure {
        path: String,
        width: f32,
        caption: String,
        label: String,
    },
}

impl ContentBlock {
    /// Whether this block is a math environment.
    pub fn is_math(&self) -> bool {
        matches!(
            self,
            ContentBlock::DisplayMath(_) | ContentBlock::Equation { .. } | ContentBlock::Align(_)
        )
    }

    /// Render the block as LaTeX source.
    pub fn to_latex(&self) -> String {
        match self {
            ContentBlock::Section(title) => format!("\\section{{{}}}", title),
            ContentBlock::Subsection(title) => format!("\\subsection{{{}}}", title),
            ContentBlock::Text(text) => text.clone(),
            ContentBlock::DisplayMath(content) => format!("\\[{}\\]", content),
            ContentBlock::Equation { content, label } => match label {
                Some(label) => format!(
                    "\\begin{{equation}}\n{}\n\\label{{eq:{}}}\n\\end{{equation}}",
                    content, label
                ),
                None => format!("\\begin{{equation}}\n{}\n\\end{{equation}}", content),
            },
            ContentBlock::Align(rows) => {
                format!("\\begin{{align}}\n{}\n\\end{{align}}", rows.join("\\\\\n"))
            }
            ContentBlock::Figure {
                path,
                width,
                caption,
                label,
            } => format!(
                "\\begin{{figure}}[H]\n    \\centering\n    \\includegraphics[width={:.2}\\textwidth]{{{}}}\n    \\caption{{{}}}\n    \\label{{{}}}\n\\end{{figure}}",
                width, path, caption, label
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_equation() {
        let block = ContentBlock::Equation {
            content: "x^{2} = 4".to_string(),
            label: Some("3".to_string()),
        };
        assert_eq!(
            block.to_latex(),
            "\\begin{equation}\nx^{2} = 4\n\\label{eq:3}\n\\end{equation}"
        );
        assert!(block.is_math());
    }

    #[test]
    fn test_align_rows() {
        let block = ContentBlock::Align(vec!["a = b".to_string(), "c = d".to_string()]);
        assert_eq!(
            block.to_latex(),
            "\\begin{align}\na = b\\\\\nc = d\n\\end{align}"
        );
    }

    #[test]
    fn test_display_math_and_headings() {
        assert_eq!(
            ContentBlock::DisplayMath("E = mc^{2}".to_string()).to_latex(),
            "\\[E = mc^{2}\\]"
        );
        assert_eq!(
            ContentBlock::Section("Introduction".to_string()).to_latex(),
            "\\section{Introduction}"
        );
        assert!(!ContentBlock::Text("plain".to_string()).is_math());
    }

    #[test]
    fn test_figure() {
        let block = ContentBlock::Figure {
            path: "image_p1_1".to_string(),
            width: 0.5,
            caption: "Image from page 1".to_string(),
            label: "fig:p1_img1".to_string(),
        };
        let latex = block.to_latex();
        assert!(latex.starts_with("\\begin{figure}[H]"));
        assert!(latex.contains("\\includegraphics[width=0.50\\textwidth]{image_p1_1}"));
        assert!(latex.contains("\\label{fig:p1_img1}"));
    }
}
