//! Plain-text rendering of a review outcome for the terminal

use std::fmt::Write;

use shared_types::ReviewOutcome;

/// Render the outcome as a report: passing records first, then flagged ones
/// with their duplicate partners and violations.
pub fn render(outcome: &ReviewOutcome) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Reviewed {} records: {} passed, {} need revision",
        outcome.len(),
        outcome.clean.len(),
        outcome.flagged.len()
    );

    if !outcome.clean.is_empty() {
        let _ = writeln!(out, "\nPassed:");
        for name in &outcome.clean {
            let _ = writeln!(out, "  [OK] {}", name);
        }
    }

    if !outcome.flagged.is_empty() {
        let _ = writeln!(out, "\nNeeds revision:");
        for flagged in &outcome.flagged {
            let _ = writeln!(out, "  [!!] {}", flagged.name);

            for pair in outcome.duplicates_of(&flagged.name) {
                if let Some(partner) = pair.partner_of(&flagged.name) {
                    let _ = writeln!(
                        out,
                        "       duplicate of {} ({} similar)",
                        partner,
                        pair.percentage()
                    );
                }
            }

            if !flagged.report.illegal_english.is_empty() {
                let words: Vec<&str> = flagged
                    .report
                    .illegal_english
                    .iter()
                    .map(String::as_str)
                    .collect();
                let _ = writeln!(out, "       English: {}", words.join(", "));
            }

            if !flagged.report.illegal_symbols.is_empty() {
                let symbols: String = flagged.report.illegal_symbols.iter().cloned().collect();
                let _ = writeln!(out, "       Symbols: {}", symbols);
            }
        }
    }

    out
}
