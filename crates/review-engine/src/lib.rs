pub mod aggregate;
pub mod matcher;
pub mod patterns;
pub mod policy;
pub mod rules;

use std::collections::HashMap;

use shared_types::{DocumentSet, DuplicatePair, ReviewOutcome, ViolationReport};
use tracing::{debug, info};

pub use policy::{PolicyError, ReviewPolicy};
pub use rules::{SequenceRatio, Similarity};

/// ReviewEngine entry point
pub struct ReviewEngine {
    policy: ReviewPolicy,
}

impl ReviewEngine {
    pub fn new() -> Self {
        Self::with_policy(ReviewPolicy::default())
    }

    pub fn with_policy(policy: ReviewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Scan one document's text for lexical violations
    pub fn scan(&self, text: &str) -> ViolationReport {
        rules::check_lexical(text, &self.policy)
    }

    /// Find near-duplicate pairs across the whole set
    pub fn detect(&self, documents: &DocumentSet) -> Vec<DuplicatePair> {
        let similarity = SequenceRatio {
            autojunk: self.policy.autojunk,
        };
        self.detect_with(documents, &similarity)
    }

    /// Duplicate detection with a caller-supplied similarity measure
    pub fn detect_with<S: Similarity>(
        &self,
        documents: &DocumentSet,
        similarity: &S,
    ) -> Vec<DuplicatePair> {
        rules::check_duplicates(documents, self.policy.duplicate_threshold, similarity)
    }

    /// Run a full review: scan every document, detect duplicates, classify
    pub fn review(&self, documents: &DocumentSet) -> ReviewOutcome {
        let reports: HashMap<String, ViolationReport> = documents
            .iter()
            .map(|doc| {
                let report = self.scan(&doc.text);
                debug!(
                    "Scanned {}: {} English, {} symbol violations",
                    doc.name,
                    report.illegal_english.len(),
                    report.illegal_symbols.len()
                );
                (doc.name.clone(), report)
            })
            .collect();

        let duplicates = self.detect(documents);
        let outcome = aggregate::aggregate(documents, &reports, duplicates);

        info!(
            "Reviewed {} documents: {} clean, {} flagged, {} duplicate pairs",
            documents.len(),
            outcome.clean.len(),
            outcome.flagged.len(),
            outcome.duplicates.len()
        );

        outcome
    }
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::new()
    }
}
