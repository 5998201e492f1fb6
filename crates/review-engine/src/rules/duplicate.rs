use shared_types::{DocumentSet, DuplicatePair};
use tracing::debug;

use crate::matcher::SequenceMatcher;

/// Pairwise text similarity in [0, 1]
pub trait Similarity {
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Sequence-matcher ratio over characters.
///
/// The matcher is not symmetric in its operands, so texts are passed in a
/// canonical order (shorter first, then lexicographic) and
/// `ratio(a, b) == ratio(b, a)` always holds.
#[derive(Debug, Clone, Copy)]
pub struct SequenceRatio {
    pub autojunk: bool,
}

impl Default for SequenceRatio {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

impl Similarity for SequenceRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let (first, second) = if (a.len(), a) <= (b.len(), b) {
            (a, b)
        } else {
            (b, a)
        };
        SequenceMatcher::new(first, second, self.autojunk).ratio()
    }
}

/// Integer percentage, truncated: 0.9699 -> 96
pub fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0) as u8
}

/// Compare every unordered pair once, in set order, and report pairs whose
/// ratio reaches `threshold`.
pub fn check_duplicates<S: Similarity>(
    documents: &DocumentSet,
    threshold: f64,
    similarity: &S,
) -> Vec<DuplicatePair> {
    let docs: Vec<_> = documents.iter().collect();
    let mut duplicates = Vec::new();

    for (i, first) in docs.iter().enumerate() {
        for second in &docs[i + 1..] {
            let ratio = similarity.ratio(&first.text, &second.text);
            debug!(
                "Similarity {} <-> {}: {:.4}",
                first.name, second.name, ratio
            );

            if ratio >= threshold {
                duplicates.push(DuplicatePair {
                    first: first.name.clone(),
                    second: second.name.clone(),
                    percent: to_percent(ratio),
                });
            }
        }
    }

    duplicates
}
