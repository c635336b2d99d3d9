//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::commentary::ResumeReview;
use crate::analysis::models::{
    CompositeAnalysis, JobDescriptionAnalysis, ResumeAnalysis, Section, SimilarityAnalysis,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description_text: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub resume_text: String,
    pub job_description_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ComprehensiveRequest {
    pub resume_text: String,
    pub job_description_text: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description_text: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review: ResumeReview,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze/resume
///
/// Top resume keywords, with LLM strengths and weaknesses when a key is set.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let commentator = state.commentator(request.api_key.as_deref());
    let section = state
        .analyzer
        .analyze_resume(&request.resume_text, commentator.as_deref())
        .await;

    Ok(Json(into_result(section)?))
}

/// POST /api/v1/analyze/job-description
pub async fn handle_analyze_job_description(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionAnalysis>, AppError> {
    let section = state
        .analyzer
        .analyze_job_description(&request.job_description_text)
        .await;

    Ok(Json(into_result(section)?))
}

/// POST /api/v1/analyze/similarity
///
/// Cosine similarity, match quality and shared keywords of the two documents.
pub async fn handle_analyze_similarity(
    State(state): State<AppState>,
    Json(request): Json<SimilarityRequest>,
) -> Result<Json<SimilarityAnalysis>, AppError> {
    let section = state
        .analyzer
        .analyze_similarity(&request.resume_text, &request.job_description_text)
        .await;

    Ok(Json(into_result(section)?))
}

/// POST /api/v1/analyze/comprehensive
///
/// All three analyses plus the LLM fit assessment. Failed stages come back as
/// `{"error": "..."}` inside the composite; the request itself succeeds.
pub async fn handle_comprehensive(
    State(state): State<AppState>,
    Json(request): Json<ComprehensiveRequest>,
) -> Result<Json<CompositeAnalysis>, AppError> {
    let commentator = state.commentator(request.api_key.as_deref());
    let composite = state
        .analyzer
        .comprehensive(
            &request.resume_text,
            &request.job_description_text,
            commentator.as_deref(),
        )
        .await;

    Ok(Json(composite))
}

/// POST /api/v1/analyze/review
///
/// LLM review of the resume: deficiencies, suggestions and critical gaps,
/// optionally tailored to a job description. Requires an API key.
pub async fn handle_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    let commentator = state
        .commentator(request.api_key.as_deref())
        .ok_or_else(|| {
            AppError::Validation(
                "An LLM API key is required: pass api_key or set GROQ_API_KEY".to_string(),
            )
        })?;

    let review = commentator
        .review(
            &request.resume_text,
            request.job_description_text.as_deref(),
        )
        .await?;

    Ok(Json(ReviewResponse { review }))
}

/// Single-stage endpoints have nothing partial to return, so a failed stage
/// is a server error.
fn into_result<T>(section: Section<T>) -> Result<T, AppError> {
    match section {
        Section::Ok(value) => Ok(value),
        Section::Failed { error } => Err(AppError::Internal(anyhow::anyhow!(error))),
    }
}
