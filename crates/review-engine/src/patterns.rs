//! Token patterns and default allow-lists for the lexical rules

use lazy_static::lazy_static;
use regex::Regex;

/// Unit abbreviations that may appear in a record
pub const UNIT_ABBREVIATIONS: &[&str] = &["cm", "mm", "m", "kg", "g", "t", "mg"];

/// Acronyms accepted in Latin script
pub const ACRONYMS: &[&str] = &[
    "CEO", "PD", "UCC", "IT", "POP", "CF", "TV", "PAPS", "SNS", "PPT",
];

/// Punctuation allowed in addition to word characters and whitespace
pub const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '\'', '-'];

lazy_static! {
    /// Maximal runs of ASCII Latin letters
    pub static ref ENGLISH_TOKEN: Regex = Regex::new(r"[a-zA-Z]+").unwrap();

    /// Any single character that is not a letter, number, underscore,
    /// whitespace or allowed punctuation. Numbers include superscripts,
    /// circled digits and fractions; combining marks are not word characters.
    pub static ref ILLEGAL_SYMBOL: Regex = Regex::new(r"[^\p{L}\p{N}_\s.,'\-]").unwrap();
}

/// Default English allow-list (case-sensitive)
pub fn default_allowed_english() -> impl Iterator<Item = &'static str> {
    UNIT_ABBREVIATIONS.iter().chain(ACRONYMS.iter()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_token_splits_on_non_letters() {
        let tokens: Vec<&str> = ENGLISH_TOKEN
            .find_iter("IT분야 abc123def x_y")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(tokens, vec!["IT", "abc", "def", "x", "y"]);
    }

    #[test]
    fn test_illegal_symbol_skips_allowed_punctuation() {
        for c in ALLOWED_PUNCTUATION {
            assert!(!ILLEGAL_SYMBOL.is_match(&c.to_string()), "{c} should be allowed");
        }
        assert!(ILLEGAL_SYMBOL.is_match("&"));
        assert!(ILLEGAL_SYMBOL.is_match("※"));
    }

    #[test]
    fn test_hangul_and_digits_are_word_characters() {
        assert!(!ILLEGAL_SYMBOL.is_match("학생 2025 _"));
    }

    #[test]
    fn test_numeric_symbols_are_word_characters() {
        for s in ["²", "①", "½", "Ⅻ"] {
            assert!(!ILLEGAL_SYMBOL.is_match(s), "{s} should count as a number");
        }
    }

    #[test]
    fn test_combining_mark_is_a_symbol() {
        assert!(ILLEGAL_SYMBOL.is_match("\u{0301}"));
    }

    #[test]
    fn test_default_allow_list_size() {
        assert_eq!(default_allowed_english().count(), 17);
    }
}
