//! Review policy: the allow-list and duplicate threshold
//!
//! Defaults reproduce the fixed rule set. A JSON policy file only needs to
//! name the fields it overrides.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patterns::default_allowed_english;

/// Similarity ratio at or above which two documents count as duplicates
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.95;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Duplicate threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid policy JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    /// Latin-letter tokens exempt from the English rule, matched exactly
    pub allowed_english: BTreeSet<String>,

    /// Minimum similarity ratio (0.0 - 1.0) for a duplicate pair
    pub duplicate_threshold: f64,

    /// Ignore very frequent characters when matching texts of 200+ characters
    pub autojunk: bool,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            allowed_english: default_allowed_english().map(str::to_string).collect(),
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
            autojunk: true,
        }
    }
}

impl ReviewPolicy {
    /// Parse and validate a policy from JSON
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let policy: ReviewPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err(PolicyError::InvalidThreshold(self.duplicate_threshold));
        }
        Ok(())
    }

    pub fn is_allowed_english(&self, token: &str) -> bool {
        self.allowed_english.contains(token)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.duplicate_threshold = threshold;
        self
    }

    pub fn allow_english(mut self, token: impl Into<String>) -> Self {
        self.allowed_english.insert(token.into());
        self
    }
}
