use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::ValidatedJson;
use crate::models::content::{GenOptions, GenResult, GenerateContentRequest};
use crate::models::envelope::{DataEnvelope, ErrorEnvelope, GenEnvelope};
use crate::state::AppState;

/// POST /v1/content/generate
#[utoipa::path(
    post,
    path = "/v1/content/generate",
    tag = "Content",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated text with token usage", body = GenEnvelope),
        (status = 400, description = "Request body failed validation", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid API key", body = ErrorEnvelope),
        (status = 500, description = "AI provider failed", body = ErrorEnvelope)
    ),
    security(("apiKey" = []))
)]
pub async fn handle_generate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GenerateContentRequest>,
) -> Result<Json<DataEnvelope<GenResult>>, AppError> {
    let opts = GenOptions {
        tone: req.tone,
        length: req.length,
    };
    let generated = state.provider.generate_content(&req.prompt, &opts).await?;
    Ok(Json(DataEnvelope::new(generated)))
}
