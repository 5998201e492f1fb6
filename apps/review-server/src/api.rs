//! API handlers for the review server
//!
//! Provides REST endpoints for:
//! - Batch review of uploaded records
//! - Correction requests for a single record
//! - Policy inspection

use axum::{extract::State, Json};
use base64::Engine;
use correction_client::request_correction;
use review_engine::ReviewPolicy;
use serde::{Deserialize, Serialize};
use shared_types::{DocumentSet, ReviewOutcome};
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "review-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Policy response
#[derive(Serialize)]
pub struct PolicyResponse {
    pub success: bool,
    #[serde(flatten)]
    pub policy: ReviewPolicy,
}

/// Handler: GET /api/policy
pub async fn handle_policy(State(state): State<AppState>) -> Json<PolicyResponse> {
    Json(PolicyResponse {
        success: true,
        policy: state.engine.policy().clone(),
    })
}

/// One uploaded record: plain text, or a base64-encoded PDF
#[derive(Debug, Deserialize)]
pub struct DocumentInput {
    /// File name; identifies the record in results
    pub name: String,

    /// Already-extracted text
    pub text: Option<String>,

    /// PDF bytes, base64-encoded (used when `text` is absent)
    pub pdf_base64: Option<String>,
}

/// Review request body
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub documents: Vec<DocumentInput>,
}

/// Review response
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    /// Names of records that passed, in upload order
    pub clean: Vec<String>,
    /// Records needing revision, in upload order
    pub flagged: Vec<FlaggedInfo>,
    pub duplicates: Vec<DuplicateInfo>,
    pub clean_count: usize,
    pub flagged_count: usize,
    /// Uploads that could not be read; they are left out of the review
    pub failed: Vec<FailedDocument>,
}

/// An upload whose text could not be loaded
#[derive(Debug, Serialize)]
pub struct FailedDocument {
    pub name: String,
    pub error: String,
}

/// Details for one flagged record
#[derive(Debug, Serialize)]
pub struct FlaggedInfo {
    pub name: String,
    pub illegal_english: Vec<String>,
    pub illegal_symbols: Vec<String>,
    /// True when similarity to another record reached the threshold
    pub duplicate: bool,
    pub duplicate_of: Vec<DuplicateMatch>,
    /// Extracted text, for a follow-up correction request
    pub text: String,
}

/// The other side of a duplicate pair
#[derive(Debug, Serialize)]
pub struct DuplicateMatch {
    pub name: String,
    pub percentage: String,
}

#[derive(Debug, Serialize)]
pub struct DuplicateInfo {
    pub first: String,
    pub second: String,
    pub percentage: String,
}

impl ReviewResponse {
    pub fn from_outcome(outcome: &ReviewOutcome) -> Self {
        let flagged: Vec<FlaggedInfo> = outcome
            .flagged
            .iter()
            .map(|f| FlaggedInfo {
                name: f.name.clone(),
                illegal_english: f.report.illegal_english.iter().cloned().collect(),
                illegal_symbols: f.report.illegal_symbols.iter().cloned().collect(),
                duplicate: f.duplicate,
                duplicate_of: outcome
                    .duplicates_of(&f.name)
                    .filter_map(|p| {
                        p.partner_of(&f.name).map(|partner| DuplicateMatch {
                            name: partner.to_string(),
                            percentage: p.percentage(),
                        })
                    })
                    .collect(),
                text: f.text.clone(),
            })
            .collect();

        let duplicates = outcome
            .duplicates
            .iter()
            .map(|p| DuplicateInfo {
                first: p.first.clone(),
                second: p.second.clone(),
                percentage: p.percentage(),
            })
            .collect();

        Self {
            success: true,
            clean: outcome.clean.clone(),
            clean_count: outcome.clean.len(),
            flagged_count: flagged.len(),
            flagged,
            duplicates,
            failed: Vec::new(),
        }
    }

    pub fn with_failures(mut self, failed: Vec<FailedDocument>) -> Self {
        self.failed = failed;
        self
    }
}

/// Handler: POST /api/review
pub async fn handle_review(
    State(state): State<AppState>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ServerError> {
    info!("Review request: {} documents", req.documents.len());

    if req.documents.is_empty() {
        return Err(ServerError::InvalidRequest(
            "At least one document is required".to_string(),
        ));
    }

    // Extraction and pairwise matching are CPU-bound
    let engine = state.engine.clone();
    let (outcome, failed) = tokio::task::spawn_blocking(
        move || -> Result<(ReviewOutcome, Vec<FailedDocument>), ServerError> {
            let (documents, failed) = load_documents(req.documents);
            if documents.is_empty() {
                let reasons: Vec<String> = failed
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.error))
                    .collect();
                return Err(ServerError::InvalidRequest(format!(
                    "No document could be read ({})",
                    reasons.join("; ")
                )));
            }
            Ok((engine.review(&documents), failed))
        },
    )
    .await
    .map_err(|e| ServerError::Internal(format!("Review task failed: {}", e)))??;

    Ok(Json(
        ReviewResponse::from_outcome(&outcome).with_failures(failed),
    ))
}

/// Build the document set, extracting text from PDFs where needed.
///
/// An upload that cannot be read is reported in the second list and does not
/// stop the others from loading.
fn load_documents(inputs: Vec<DocumentInput>) -> (DocumentSet, Vec<FailedDocument>) {
    let mut documents = DocumentSet::new();
    let mut failed = Vec::new();

    for input in inputs {
        match load_text(input.text, input.pdf_base64) {
            Ok(text) => {
                debug!("Loaded {} ({} chars)", input.name, text.chars().count());
                documents.insert(input.name, text);
            }
            Err(error) => {
                warn!("Skipping {}: {}", input.name, error);
                failed.push(FailedDocument {
                    name: input.name,
                    error,
                });
            }
        }
    }

    (documents, failed)
}

fn load_text(text: Option<String>, pdf_base64: Option<String>) -> Result<String, String> {
    match (text, pdf_base64) {
        (Some(text), _) => Ok(text),
        (None, Some(encoded)) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| format!("invalid base64 PDF data: {}", e))?;
            shared_pdf::extract_text(&bytes).map_err(|e| e.to_string())
        }
        (None, None) => Err("either 'text' or 'pdf_base64' is required".to_string()),
    }
}

/// Correction request body
#[derive(Debug, Deserialize)]
pub struct CorrectRequest {
    /// Record name, echoed back
    pub name: Option<String>,

    /// Original record text
    pub text: String,

    /// Overrides the server's configured API key for this request
    pub api_key: Option<String>,
}

/// Correction response
#[derive(Debug, Serialize)]
pub struct CorrectResponse {
    pub success: bool,
    pub name: Option<String>,
    /// Suggested body; advisory only, not re-checked
    pub corrected_text: String,
}

/// Handler: POST /api/correct
pub async fn handle_correct(
    State(state): State<AppState>,
    Json(req): Json<CorrectRequest>,
) -> Result<Json<CorrectResponse>, ServerError> {
    info!(
        "Correction request: {}",
        req.name.as_deref().unwrap_or("<unnamed>")
    );

    let mut config = state.correction.clone();
    if let Some(key) = req.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(key);
    }

    let generator = state.generator.clone();
    let text = req.text;
    let corrected_text =
        tokio::task::spawn_blocking(move || request_correction(generator.as_ref(), &config, &text))
            .await
            .map_err(|e| ServerError::Internal(format!("Correction task failed: {}", e)))??;

    Ok(Json(CorrectResponse {
        success: true,
        name: req.name,
        corrected_text,
    }))
}
