use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::chat::{InsightsRequest, InsightsResult, SummarizeRequest, SummaryResult};
use crate::models::envelope::{DataEnvelope, ErrorEnvelope, InsightsEnvelope, SummaryEnvelope};
use crate::state::AppState;

/// POST /v1/chat/summarize
#[utoipa::path(
    post,
    path = "/v1/chat/summarize",
    tag = "Chat",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary, key points, and action items", body = SummaryEnvelope),
        (status = 400, description = "Request body failed validation", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "AI provider failed", body = ErrorEnvelope)
    ),
    security(("apiKey" = []))
)]
pub async fn handle_summarize(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SummarizeRequest>,
) -> Result<Json<DataEnvelope<SummaryResult>>, AppError> {
    let summary = state
        .provider
        .summarize_chat(&req.messages, req.style)
        .await?;
    Ok(Json(DataEnvelope::new(summary)))
}

/// POST /v1/chat/insights
#[utoipa::path(
    post,
    path = "/v1/chat/insights",
    tag = "Chat",
    request_body = InsightsRequest,
    responses(
        (status = 200, description = "Sentiment, topics, and entities", body = InsightsEnvelope),
        (status = 400, description = "Request body failed validation", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "AI provider failed", body = ErrorEnvelope)
    ),
    security(("apiKey" = []))
)]
pub async fn handle_insights(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<InsightsRequest>,
) -> Result<Json<DataEnvelope<InsightsResult>>, AppError> {
    let insights = state
        .provider
        .extract_insights(&req.messages, req.signals)
        .await?;
    Ok(Json(DataEnvelope::new(insights)))
}
