use shared_types::ViolationReport;

use crate::patterns::{ENGLISH_TOKEN, ILLEGAL_SYMBOL};
use crate::policy::ReviewPolicy;

/// Check a document's text for disallowed English tokens and symbols.
///
/// English tokens are maximal `[a-zA-Z]+` runs compared case-sensitively
/// against the policy's allow-list, with no stemming or case folding. Every
/// character that is not a letter, number, underscore, whitespace, or one of
/// `. , ' -` is reported as a symbol. Both sets are deduplicated.
pub fn check_lexical(text: &str, policy: &ReviewPolicy) -> ViolationReport {
    let illegal_english = ENGLISH_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !policy.is_allowed_english(token))
        .map(str::to_string)
        .collect();

    let illegal_symbols = ILLEGAL_SYMBOL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    ViolationReport {
        illegal_english,
        illegal_symbols,
    }
}
