use thiserror::Error;

/// Correction request failures. None of these are retried automatically.
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("No API key configured for the text generation service")]
    MissingCredential,

    #[error("Text generation service unavailable ({status}), retry later")]
    Unavailable {
        status: u16,
        retry_after_secs: Option<u64>,
    },

    #[error("Text generation service error: {0}")]
    Service(String),

    #[error("Text generation service returned no text")]
    EmptyResponse,
}

impl CorrectionError {
    /// True when the same request may succeed if sent again later
    pub fn is_retry_later(&self) -> bool {
        matches!(self, CorrectionError::Unavailable { .. })
    }
}

/// Status codes that mean "try again later" rather than "this request is wrong"
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 503)
}
