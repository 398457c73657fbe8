//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::analysis::feedback::FeedbackMode;
use crate::analysis::pipeline::{run_analysis, AnalysisRequest, AnalysisResponse, ResumeSource};
use crate::analysis::vocabulary::{vocabulary_listing, VocabularyListing};
use crate::errors::AppError;
use crate::state::AppState;

/// Header carrying a caller-supplied credential for delegated feedback.
pub const API_KEY_HEADER: &str = "x-feedback-api-key";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub feedback: FeedbackMode,
    pub api_key: Option<String>,
    #[serde(default = "default_save")]
    pub save: bool,
}

fn default_save() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF file), `job_description` (text), and optional
/// `feedback` (auto | template | ai | none), `api_key`, `save` (true | false).
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut request = AnalysisRequest {
        resume: None,
        job_description: String::new(),
        feedback: FeedbackMode::default(),
        api_key: header_api_key(&headers),
        save: true,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(e.body_text()))?;
                info!("Received resume upload ({} bytes)", bytes.len());
                request.resume = Some(ResumeSource::Pdf(bytes));
            }
            "job_description" => request.job_description = field_text(field).await?,
            "feedback" => {
                request.feedback = field_text(field)
                    .await?
                    .parse()
                    .map_err(AppError::Validation)?
            }
            "api_key" => {
                let key = field_text(field).await?;
                if !key.trim().is_empty() {
                    request.api_key = Some(key.trim().to_string());
                }
            }
            "save" => request.save = parse_flag(&field_text(field).await?)?,
            _ => {}
        }
    }

    Ok(Json(run_analysis(&state, request).await?))
}

/// POST /api/v1/analyze/text
///
/// Same analysis for resume text that was extracted elsewhere.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let request = AnalysisRequest {
        resume: Some(ResumeSource::Text(body.resume_text)),
        job_description: body.job_description,
        feedback: body.feedback,
        api_key: body_api_key(body.api_key).or_else(|| header_api_key(&headers)),
        save: body.save,
    };

    Ok(Json(run_analysis(&state, request).await?))
}

/// GET /api/v1/vocabulary
pub async fn handle_vocabulary() -> Json<VocabularyListing> {
    Json(vocabulary_listing())
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Upload(e.body_text()))
}

fn body_api_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

fn header_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::Validation(format!(
            "save must be true or false, got '{other}'"
        ))),
    }
}
