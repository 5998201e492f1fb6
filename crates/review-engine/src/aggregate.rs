//! Merge lexical reports and duplicate pairs into a clean/flagged partition

use std::collections::{HashMap, HashSet};

use shared_types::{DocumentSet, DuplicatePair, FlaggedDocument, ReviewOutcome, ViolationReport};

/// Classify every document as clean or flagged.
///
/// A document is flagged when its report has any violation or it appears in
/// any duplicate pair. Documents without a report are treated as lexically
/// clean. Both partitions keep the set's order, so together they cover the
/// input exactly once.
pub fn aggregate(
    documents: &DocumentSet,
    reports: &HashMap<String, ViolationReport>,
    duplicates: Vec<DuplicatePair>,
) -> ReviewOutcome {
    let duplicate_involved: HashSet<&str> = duplicates
        .iter()
        .flat_map(|p| [p.first.as_str(), p.second.as_str()])
        .collect();

    let mut clean = Vec::new();
    let mut flagged = Vec::new();

    for document in documents {
        let report = reports.get(&document.name).cloned().unwrap_or_default();
        let duplicate = duplicate_involved.contains(document.name.as_str());

        if !report.is_clean() || duplicate {
            flagged.push(FlaggedDocument {
                name: document.name.clone(),
                report,
                duplicate,
                text: document.text.clone(),
            });
        } else {
            clean.push(document.name.clone());
        }
    }

    ReviewOutcome {
        clean,
        flagged,
        duplicates,
    }
}
