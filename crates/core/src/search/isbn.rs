//! ISBN helpers.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static ISBN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{9}[\dXx]|\d{13})$").expect("ISBN pattern is valid")
});

/// Strip hyphens and surrounding whitespace.
pub fn normalize_isbn(raw: &str) -> String {
    raw.replace('-', "").trim().to_string()
}

/// Whether a normalized ISBN has the ISBN-10 or ISBN-13 shape.
///
/// Checksums are not verified; providers are the authority on what exists.
pub fn is_well_formed(isbn: &str) -> bool {
    ISBN_SHAPE.is_match(isbn)
}

/// Whether the ISBN should be tried against the domestic catalog first.
pub fn has_prefix(isbn: &str, prefix: &str) -> bool {
    isbn.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_hyphens_and_whitespace() {
        assert_eq!(normalize_isbn("978-4-00-000000-0"), "9784000000000");
        assert_eq!(normalize_isbn("  9780000000002 \n"), "9780000000002");
        assert_eq!(normalize_isbn(" 4-06-123456-X "), "406123456X");
    }

    #[test]
    fn test_normalize_keeps_inner_spaces() {
        assert_eq!(normalize_isbn("978 4"), "978 4");
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed("9784000000000"));
        assert!(is_well_formed("406123456X"));
        assert!(is_well_formed("4061234567"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("978400000000"));
        assert!(!is_well_formed("97840000000000"));
        assert!(!is_well_formed("978400000000A"));
    }

    #[test]
    fn test_domestic_prefix() {
        assert!(has_prefix("9784000000000", "9784"));
        assert!(!has_prefix("9780000000002", "9784"));
        assert!(!has_prefix("4061234567", "9784"));
    }
}
