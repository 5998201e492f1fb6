pub mod document;
pub mod types;

pub use document::{Document, DocumentSet};
pub use types::{DuplicatePair, FlaggedDocument, ReviewOutcome, ViolationReport};
