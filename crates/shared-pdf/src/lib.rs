//! Shared PDF handling utilities
//!
//! Turns uploaded PDF files into the plain text the review engine consumes.
//! Layout, fonts and column handling are left to the underlying parsers.

pub mod extract;

pub use extract::{extract_file, extract_text, ExtractError};
