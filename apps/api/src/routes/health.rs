use axum::{extract::State, Json};

use crate::models::envelope::{DataEnvelope, HealthEnvelope};
use crate::models::system::HealthStatus;
use crate::state::AppState;

/// GET /health
/// Liveness probe. Never requires an API key.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server health status, uptime, and build version", body = HealthEnvelope)
    )
)]
pub async fn handle_health(State(state): State<AppState>) -> Json<DataEnvelope<HealthStatus>> {
    Json(DataEnvelope::new(HealthStatus {
        status: "ok".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64().round() as u64,
        build_version: state.config.build_version.clone(),
    }))
}
