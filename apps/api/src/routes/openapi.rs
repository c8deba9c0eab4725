use axum::{extract::State, Json};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::chat::{
    InsightSignals, InsightsRequest, InsightsResult, Message, Role, Sentiment, SummarizeRequest,
    SummaryResult, SummaryStyle,
};
use crate::models::content::{ContentLength, GenResult, GenerateContentRequest, TokenUsage};
use crate::models::envelope::{
    ErrorBody, ErrorEnvelope, GenEnvelope, HealthEnvelope, ImproveEnvelope, InsightsEnvelope,
    ScoreEnvelope, SummaryEnvelope,
};
use crate::models::resume::{ImproveResult, ImproveResumeRequest, ScoreResult, ScoreResumeRequest};
use crate::models::system::HealthStatus;
use crate::routes::{chat, content, health, resume};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AI Backend Platform",
        description = "Chat summarization, conversation insights, resume scoring and rewriting, and free-form content generation."
    ),
    paths(
        health::handle_health,
        chat::handle_summarize,
        chat::handle_insights,
        resume::handle_score,
        resume::handle_improve,
        content::handle_generate,
    ),
    components(schemas(
        Role,
        Message,
        SummaryStyle,
        SummarizeRequest,
        InsightSignals,
        InsightsRequest,
        SummaryResult,
        Sentiment,
        InsightsResult,
        ScoreResumeRequest,
        ImproveResumeRequest,
        ScoreResult,
        ImproveResult,
        ContentLength,
        GenerateContentRequest,
        TokenUsage,
        GenResult,
        HealthStatus,
        HealthEnvelope,
        SummaryEnvelope,
        InsightsEnvelope,
        ScoreEnvelope,
        ImproveEnvelope,
        GenEnvelope,
        ErrorEnvelope,
        ErrorBody,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Chat", description = "Conversation summaries and insights"),
        (name = "Resume", description = "Resume scoring and rewriting"),
        (name = "Content", description = "Free-form text generation")
    )
)]
pub struct ApiDoc;

/// Registers the `X-API-KEY` header scheme referenced by the `/v1` paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "apiKey",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
        );
    }
}

/// The document with `info.version` set to the running build.
pub fn document(build_version: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.version = build_version.to_string();
    doc
}

/// GET /openapi.json
pub async fn handle_openapi(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(document(&state.config.build_version))
}
