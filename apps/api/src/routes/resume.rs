use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::envelope::{DataEnvelope, ErrorEnvelope, ImproveEnvelope, ScoreEnvelope};
use crate::models::resume::{ImproveResult, ImproveResumeRequest, ScoreResult, ScoreResumeRequest};
use crate::state::AppState;

/// POST /v1/resume/score
#[utoipa::path(
    post,
    path = "/v1/resume/score",
    tag = "Resume",
    request_body = ScoreResumeRequest,
    responses(
        (status = 200, description = "ATS score with strengths, gaps, and suggestions", body = ScoreEnvelope),
        (status = 400, description = "Request body failed validation", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "AI provider failed", body = ErrorEnvelope)
    ),
    security(("apiKey" = []))
)]
pub async fn handle_score(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ScoreResumeRequest>,
) -> Result<Json<DataEnvelope<ScoreResult>>, AppError> {
    let score = state
        .provider
        .score_resume(&req.resume_text, req.job_description.as_deref())
        .await?;
    Ok(Json(DataEnvelope::new(score)))
}

/// POST /v1/resume/improve
#[utoipa::path(
    post,
    path = "/v1/resume/improve",
    tag = "Resume",
    request_body = ImproveResumeRequest,
    responses(
        (status = 200, description = "Rewritten resume with change notes", body = ImproveEnvelope),
        (status = 400, description = "Request body failed validation", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "AI provider failed", body = ErrorEnvelope)
    ),
    security(("apiKey" = []))
)]
pub async fn handle_improve(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ImproveResumeRequest>,
) -> Result<Json<DataEnvelope<ImproveResult>>, AppError> {
    let improved = state
        .provider
        .improve_resume(
            &req.resume_text,
            req.job_description.as_deref(),
            req.target_role.as_deref(),
        )
        .await?;
    Ok(Json(DataEnvelope::new(improved)))
}
