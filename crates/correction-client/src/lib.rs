//! Correction requests for flagged records
//!
//! A flagged document's text is sent to a generative text service together
//! with a fixed instruction template, and the service's reply is returned as
//! an advisory corrected body. The reply is not re-checked against the review
//! rules.
//!
//! The credential is part of [`CorrectionConfig`] and is passed in on every
//! call. A missing credential is rejected before any request is built.

pub mod error;
pub mod gemini;
pub mod prompt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use error::CorrectionError;
pub use gemini::GeminiClient;
pub use prompt::{build_correction_prompt, CORRECTION_INSTRUCTION};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Service settings supplied by the caller for each request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl CorrectionConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The configured key, ignoring blank values
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// Keep the key out of logs and panic messages
impl std::fmt::Debug for CorrectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrectionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// One prompt addressed to a model
#[derive(Debug)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub endpoint: &'a str,
    pub prompt: String,
}

/// A generative text backend
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, CorrectionError>;
}

/// Request a corrected version of one document's text.
///
/// Blocks until the service answers. Failures are returned to the caller
/// as-is; nothing is retried.
pub fn request_correction<G: TextGenerator + ?Sized>(
    generator: &G,
    config: &CorrectionConfig,
    original_text: &str,
) -> Result<String, CorrectionError> {
    let api_key = config.credential().ok_or(CorrectionError::MissingCredential)?;

    info!(
        "Requesting correction from {} ({} chars)",
        config.model,
        original_text.chars().count()
    );

    let request = GenerationRequest {
        api_key,
        model: &config.model,
        endpoint: &config.endpoint,
        prompt: build_correction_prompt(original_text),
    };

    generator.generate(&request).inspect_err(|e| {
        warn!("Correction request failed: {}", e);
    })
}
