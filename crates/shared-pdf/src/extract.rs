//! PDF text extraction
//!
//! Pages are extracted in page order and joined with no separator, so the
//! result is one continuous body of text per document.

use std::path::Path;

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    Parse(String),

    #[error("PDF extraction panicked (malformed PDF)")]
    Malformed,
}

/// Extract the full text of a PDF held in memory
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    match extract_pages(bytes) {
        Ok(text) => {
            debug!("PDF extracted with lopdf: {} chars", text.chars().count());
            Ok(text)
        }
        Err(e) => {
            debug!("lopdf extraction failed: {}, trying fallback", e);
            extract_fallback(bytes)
        }
    }
}

/// Read a PDF from disk and extract its full text
pub fn extract_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.display().to_string(),
        source,
    })?;
    extract_text(&bytes)
}

fn extract_pages(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let document = Document::load_mem(bytes)?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        text.push_str(&document.extract_text(&[*page_number])?);
    }
    Ok(text)
}

fn extract_fallback(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf_extract can panic on malformed input
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => {
            debug!(
                "PDF extracted with pdf_extract fallback: {} chars",
                text.chars().count()
            );
            Ok(text)
        }
        Ok(Err(e)) => Err(ExtractError::Parse(e.to_string())),
        Err(_) => Err(ExtractError::Malformed),
    }
}
