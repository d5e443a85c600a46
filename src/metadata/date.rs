//! Date detection and normalization.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

const MONTH: &str = "(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\\.?";

lazy_static! {
    /// Date shapes searched for in body text, most specific first.
    pub(crate) static ref DATE_SHAPES: Vec<Regex> = vec![
        Regex::new(&format!(r"(?i)\b{}\s+\d{{1,2}},?\s+\d{{4}}\b", MONTH)).unwrap(),
        Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{4}\b").unwrap(),
        Regex::new(r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b").unwrap(),
        Regex::new(&format!(r"(?i)\b{}\s+\d{{4}}\b", MONTH)).unwrap(),
    ];

    static ref PDF_STAMP: Regex = Regex::new(r"^D:(\d{4})(\d{2})(\d{2})").unwrap();
    static ref ISO_DATE: Regex = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").unwrap();
    static ref NUMERIC_DATE: Regex = Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{4}").unwrap();
    static ref TEXTUAL_DATE: Regex = Regex::new(r"^[A-Za-z]+\.?\s+\d{1,2},?\s+\d{4}").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^[A-Za-z]+\.?\s+\d{4}$").unwrap();
    static ref BARE_YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

const MAX_RAW_DATE_CHARS: usize = 50;

/// Normalize a date string for `\date{...}`.
///
/// PDF stamps (`D:YYYYMMDD...`) and ISO dates become `DD/MM/YYYY`.
/// Numeric, textual and month-year dates pass through unchanged. Anything
/// else falls back to its first four-digit year, then to the raw string
/// cut at 50 characters.
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }

    for pattern in [&*PDF_STAMP, &*ISO_DATE] {
        if let Some(formatted) = pattern.captures(date).and_then(|caps| {
            ymd(&caps[1], &caps[2], &caps[3]).map(|d| d.format("%d/%m/%Y").to_string())
        }) {
            return formatted;
        }
    }

    if NUMERIC_DATE.is_match(date) || TEXTUAL_DATE.is_match(date) || MONTH_YEAR.is_match(date) {
        return date.to_string();
    }

    if let Some(year) = BARE_YEAR.captures(date) {
        return year[1].to_string();
    }

    log::debug!("Unrecognized date format: {}", date);
    date.chars().take(MAX_RAW_DATE_CHARS).collect()
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// First date-shaped substring of `text`, trying shapes in order.
pub fn find_date(text: &str) -> Option<&str> {
    DATE_SHAPES
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pdf_stamp_and_iso() {
        assert_eq!(format_date("D:20240115120000"), "15/01/2024");
        assert_eq!(format_date("D:20240115120000+05'00'"), "15/01/2024");
        assert_eq!(format_date("2024-01-15"), "15/01/2024");
        assert_eq!(format_date("2024-01-15T08:30:00Z"), "15/01/2024");
    }

    #[test]
    fn test_format_passthrough() {
        assert_eq!(format_date("January 15, 2024"), "January 15, 2024");
        assert_eq!(format_date("15/01/2024"), "15/01/2024");
        assert_eq!(format_date("01-15-2024"), "01-15-2024");
        assert_eq!(format_date("March 2023"), "March 2023");
    }

    #[test]
    fn test_format_year_fallback() {
        assert_eq!(format_date("2024"), "2024");
        assert_eq!(format_date("Published in 2019 by ACM"), "2019");
    }

    #[test]
    fn test_invalid_iso_falls_back_to_year() {
        assert_eq!(format_date("2024-13-45"), "2024");
    }

    #[test]
    fn test_format_truncates_unrecognized() {
        let raw = "sometime around the late afternoon of a rainy day in spring";
        let formatted = format_date(raw);
        assert_eq!(formatted.chars().count(), 50);
        assert!(raw.starts_with(&formatted));
    }

    #[test]
    fn test_format_blank() {
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("   "), "");
    }

    #[test]
    fn test_find_date() {
        assert_eq!(
            find_date("Report issued October 13, 2025 in Paris"),
            Some("October 13, 2025")
        );
        assert_eq!(find_date("Due 2025/10/13"), Some("2025/10/13"));
        assert_eq!(find_date("Spring Sept 2021 edition"), Some("Sept 2021"));
        assert_eq!(find_date("no dates here"), None);
    }
}
