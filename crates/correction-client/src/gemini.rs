//! Google Gemini `generateContent` client.
//!
//! Blocking by design: a correction is one synchronous round trip triggered
//! by a user action. No timeout or retry is layered on top of reqwest's
//! defaults. Async callers should run it on a blocking worker.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{is_transient_status, CorrectionError};
use crate::{GenerationRequest, TextGenerator};

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// HTTP client for the Gemini API. Holds no credential; each request carries its own.
#[derive(Debug, Clone, Default)]
pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, CorrectionError> {
        let url = format!(
            "{}/models/{}:generateContent",
            request.endpoint.trim_end_matches('/'),
            request.model
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
        };

        debug!("Gemini: POST models/{}:generateContent", request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .send()
            .map_err(|e| CorrectionError::Service(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        let text = response
            .text()
            .map_err(|e| CorrectionError::Service(format!("Failed to read response: {}", e)))?;

        parse_response(status, retry_after_secs, &text)
    }
}

/// Turn a raw HTTP status and body into corrected text or a classified error
fn parse_response(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> Result<String, CorrectionError> {
    if is_transient_status(status.as_u16()) {
        warn!("Gemini unavailable ({}), not retrying", status);
        return Err(CorrectionError::Unavailable {
            status: status.as_u16(),
            retry_after_secs,
        });
    }

    let parsed: Option<GeminiResponse> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let detail = parsed
            .and_then(|r| r.error)
            .map(|e| e.message)
            .unwrap_or_else(|| body.to_string());
        warn!("Gemini API error ({})", status);
        return Err(CorrectionError::Service(format!(
            "Gemini API error ({}): {}",
            status, detail
        )));
    }

    let parsed = parsed.ok_or_else(|| {
        CorrectionError::Service("Failed to parse Gemini response".to_string())
    })?;

    if let Some(error) = parsed.error {
        return Err(CorrectionError::Service(error.message));
    }

    let text: String = parsed
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(CorrectionError::EmptyResponse);
    }

    Ok(text)
}
