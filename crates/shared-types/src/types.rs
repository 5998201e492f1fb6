use std::collections::BTreeSet;

/// Lexical violations found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ViolationReport {
    pub illegal_english: BTreeSet<String>, // Latin-letter runs outside the allow-list
    pub illegal_symbols: BTreeSet<String>, // One entry per offending character
}

impl ViolationReport {
    pub fn is_clean(&self) -> bool {
        self.illegal_english.is_empty() && self.illegal_symbols.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.illegal_english.len() + self.illegal_symbols.len()
    }
}

/// Two documents whose similarity reached the duplicate threshold
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DuplicatePair {
    pub first: String,
    pub second: String,
    pub percent: u8, // floor(ratio * 100)
}

impl DuplicatePair {
    pub fn involves(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// The other member of the pair, if `name` is one of them
    pub fn partner_of(&self, name: &str) -> Option<&str> {
        if self.first == name {
            Some(&self.second)
        } else if self.second == name {
            Some(&self.first)
        } else {
            None
        }
    }

    /// Display form, e.g. "96%"
    pub fn percentage(&self) -> String {
        format!("{}%", self.percent)
    }
}

/// A document that failed review
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FlaggedDocument {
    pub name: String,
    pub report: ViolationReport,
    pub duplicate: bool,
    pub text: String, // Kept for correction requests
}

/// Result of one review run. `clean` and `flagged` partition the input set.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReviewOutcome {
    pub clean: Vec<String>,
    pub flagged: Vec<FlaggedDocument>,
    pub duplicates: Vec<DuplicatePair>,
}

impl ReviewOutcome {
    pub fn is_clean(&self, name: &str) -> bool {
        self.clean.iter().any(|n| n == name)
    }

    pub fn flagged(&self, name: &str) -> Option<&FlaggedDocument> {
        self.flagged.iter().find(|f| f.name == name)
    }

    /// Duplicate pairs that include `name`
    pub fn duplicates_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DuplicatePair> {
        self.duplicates.iter().filter(move |p| p.involves(name))
    }

    pub fn all_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clean.len() + self.flagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
