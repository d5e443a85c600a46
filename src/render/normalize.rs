//! Text normalization applied to page text before classification.
//!
//! Line structure is preserved: the assembler relies on line and paragraph
//! boundaries, so nothing here merges lines except words hyphenated across
//! a line break.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref LINE_BREAK_HYPHEN: Regex = Regex::new(r"([a-z])-[ \t]*\n[ \t]*([a-z])").unwrap();
}

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Options for text normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Expand typographic ligatures (ﬁ, ﬂ, ...)
    pub fix_ligatures: bool,

    /// Remove the Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove soft hyphens (U+00AD)
    pub remove_soft_hyphens: bool,

    /// Remove Private Use Area characters
    pub remove_pua: bool,

    /// Join lowercase words hyphenated across a line break
    pub fix_hyphenation: bool,
}

impl NormalizeOptions {
    /// NFC and line endings only.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_soft_hyphens: false,
            remove_pua: false,
            fix_hyphenation: false,
        }
    }

    /// Everything enabled.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            remove_soft_hyphens: true,
            remove_pua: true,
            fix_hyphenation: true,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Page text normalizer.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    options: NormalizeOptions,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize `text`.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        let opts = &self.options;
        if opts.fix_ligatures
            || opts.remove_replacement_char
            || opts.remove_soft_hyphens
            || opts.remove_pua
        {
            result = self.map_chars(&result);
        }

        if opts.fix_hyphenation {
            result = LINE_BREAK_HYPHEN.replace_all(&result, "${1}${2}").into_owned();
        }

        result
    }

    fn map_chars(&self, text: &str) -> String {
        let opts = &self.options;
        let mut out = String::with_capacity(text.len());

        for c in text.chars() {
            if opts.remove_replacement_char && c == '\u{FFFD}' {
                continue;
            }
            if opts.remove_soft_hyphens && c == '\u{00AD}' {
                continue;
            }
            if opts.remove_pua && is_private_use(c) {
                continue;
            }
            if opts.fix_ligatures {
                if let Some((_, expanded)) = LIGATURES.iter().find(|(l, _)| *l == c) {
                    out.push_str(expanded);
                    continue;
                }
            }
            out.push(c);
        }

        out
    }
}

fn is_private_use(c: char) -> bool {
    let code = c as u32;
    (0xE000..=0xF8FF).contains(&code)
        || (0xF0000..=0xFFFFD).contains(&code)
        || (0x100000..=0x10FFFD).contains(&code)
}
