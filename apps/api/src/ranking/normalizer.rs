//! Text normalization: the first stage of every analysis.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s\-]").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Lowercases, collapses whitespace, replaces anything outside `[a-z0-9 -]`
/// with a space and drops standalone 19xx/20xx years.
///
/// Total: empty or garbage input yields an empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    let cleaned = DISALLOWED.replace_all(collapsed.trim(), " ");
    let without_years = YEAR.replace_all(&cleaned, "");
    // Replacements above leave gaps behind
    WHITESPACE.replace_all(&without_years, " ").trim().to_string()
}

/// Splits normalized text into words.
pub fn words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Rust, Go & C++!"), "rust go c");
    }

    #[test]
    fn test_keeps_digits_and_hyphens() {
        assert_eq!(
            normalize("5 years of hands-on experience"),
            "5 years of hands-on experience"
        );
    }

    #[test]
    fn test_strips_standalone_years() {
        assert_eq!(normalize("Joined in 2020, left 1999"), "joined in left");
        assert_eq!(normalize("Engineer 2019-2021"), "engineer -");
    }

    #[test]
    fn test_keeps_non_year_numbers() {
        assert_eq!(normalize("2100 users and 1850 servers"), "2100 users and 1850 servers");
        assert_eq!(normalize("model v2020x"), "model v2020x");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  python\n\n\tdeveloper  "), "python developer");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ??? ..."), "");
    }

    #[test]
    fn test_non_ascii_letters_become_separators() {
        assert_eq!(normalize("Café Développeur"), "caf d veloppeur");
    }
}
