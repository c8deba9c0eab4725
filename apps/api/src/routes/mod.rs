pub mod chat;
pub mod content;
pub mod health;
pub mod openapi;
pub mod resume;

use std::any::Any;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, OriginalUri},
    http::{Method, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::errors::AppError;
use crate::middleware::auth::AuthLayer;
use crate::middleware::rate_limit::enforce_rate_limit;
use crate::middleware::security::{cors_layer, with_security_headers};
use crate::state::AppState;

/// Unknown paths and known paths hit with the wrong method both land here.
/// `OriginalUri` keeps the `/v1` prefix that nesting strips.
async fn handle_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("{method} {}", uri.path()))
}

/// A panicking handler becomes a generic 500 envelope; the payload is only logged.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

fn request_span(req: &Request<Body>) -> tracing::Span {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id = %request_id,
    )
}

/// Full application: public routes, the key-guarded `/v1` group, and the
/// transport stack. Request ids are assigned outermost so every log line and
/// error response can carry one.
pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/chat/summarize", post(chat::handle_summarize).fallback(handle_not_found))
        .route("/chat/insights", post(chat::handle_insights).fallback(handle_not_found))
        .route("/resume/score", post(resume::handle_score).fallback(handle_not_found))
        .route("/resume/improve", post(resume::handle_improve).fallback(handle_not_found))
        .route("/content/generate", post(content::handle_generate).fallback(handle_not_found))
        .route_layer(AuthLayer::new(state.config.api_key.clone()));

    let router = Router::new()
        .route("/health", get(health::handle_health).fallback(handle_not_found))
        .route("/openapi.json", get(openapi::handle_openapi).fallback(handle_not_found))
        .nest("/v1", v1)
        .fallback(handle_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(state.config.max_body_size_bytes))
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            enforce_rate_limit,
        ));

    with_security_headers(router, state.config.environment)
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
