//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::extract::{extract_text, DocumentKind, ExtractError};
use crate::matching::orchestrator::MatchResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

fn no_data(rejection: JsonRejection) -> AppError {
    debug!("Rejected request body: {}", rejection.body_text());
    AppError::Validation("No data provided".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Scores a resume against a job description. Analysis failures come back as
/// a zero-score result, not an error status.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<MatchResult>, AppError> {
    let Json(request) = payload.map_err(no_data)?;

    if request.resume_text.trim().is_empty() || request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Both resume_text and job_description are required".to_string(),
        ));
    }

    info!(
        "Received analysis request. Resume length: {}, Job description length: {}",
        request.resume_text.len(),
        request.job_description.len()
    );

    let result = state
        .matcher
        .analyze(&request.resume_text, &request.job_description)
        .await;

    Ok(Json(result))
}

/// POST /skills
///
/// Extracts the skill set of a single text, sorted.
pub async fn handle_skills(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<SkillsResponse>, AppError> {
    let Json(request) = payload.map_err(no_data)?;

    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let skills = state.matcher.extract_skills(&request.text).await?;

    Ok(Json(SkillsResponse {
        skills: skills.into_iter().collect(),
    }))
}

/// POST /extract
///
/// Multipart upload with a `file` field (PDF or plain text). Returns the
/// document text, ready to send as `resume_text`.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let kind = DocumentKind::detect(field.content_type(), field.file_name())?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;

        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        // PDF parsing is CPU-bound and can panic on hostile input.
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
            .await
            .map_err(|e| ExtractError::Pdf(format!("parser aborted: {e}")))??;

        return Ok(Json(ExtractResponse { text }));
    }

    Err(AppError::Validation("A 'file' field is required".to_string()))
}
