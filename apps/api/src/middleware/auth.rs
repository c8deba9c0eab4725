//! API key guard for the `/v1` routes.
//!
//! A single shared secret, compared by exact string equality against the
//! `X-API-KEY` header. No sessions, no expiry.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};

use crate::errors::{AppError, AuthFailure};

pub const API_KEY_HEADER: &str = "x-api-key";

/// A tower Layer that rejects requests without the configured API key.
/// Mount it with `route_layer` on the protected router only.
#[derive(Clone)]
pub struct AuthLayer {
    api_key: Arc<String>,
}

impl AuthLayer {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: Arc::new(api_key),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            api_key: Arc::clone(&self.api_key),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    api_key: Arc<String>,
}

/// Checks a presented key against the configured one.
pub fn check_api_key(presented: Option<&str>, expected: &str) -> Result<(), AuthFailure> {
    match presented {
        None => Err(AuthFailure::MissingKey),
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(AuthFailure::InvalidKey),
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // An empty header counts as missing; a non-UTF-8 one can never match.
        let presented = req
            .headers()
            .get(API_KEY_HEADER)
            .map(|v| v.to_str().unwrap_or("\u{fffd}"))
            .filter(|v| !v.is_empty());

        match check_api_key(presented, &self.api_key) {
            Ok(()) => {
                // Swap in the clone so the service that was polled ready handles the call.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(failure) => {
                let response = AppError::Unauthorized(failure).into_response();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let protected = Router::new()
            .route("/chat/summarize", post(|| async { "summary" }))
            .route_layer(AuthLayer::new("test-key-123".to_string()));

        Router::new()
            .route("/health", get(|| async { "ok" }))
            .nest("/v1", protected)
    }

    async fn error_message(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        body["error"]["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_rejects_missing_key() {
        let resp = test_router()
            .oneshot(
                Request::post("/v1/chat/summarize")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(error_message(resp).await.contains("Missing"));
    }

    #[tokio::test]
    async fn test_rejects_wrong_key() {
        let resp = test_router()
            .oneshot(
                Request::post("/v1/chat/summarize")
                    .header(API_KEY_HEADER, "wrong-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(error_message(resp).await.contains("Invalid"));
    }

    #[tokio::test]
    async fn test_allows_valid_key() {
        let resp = test_router()
            .oneshot(
                Request::post("/v1/chat/summarize")
                    .header("X-API-KEY", "test-key-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_is_exempt() {
        let resp = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_check_api_key_requires_exact_match() {
        assert_eq!(check_api_key(None, "k"), Err(AuthFailure::MissingKey));
        assert_eq!(check_api_key(Some("K"), "k"), Err(AuthFailure::InvalidKey));
        assert_eq!(check_api_key(Some("k "), "k"), Err(AuthFailure::InvalidKey));
        assert_eq!(check_api_key(Some("k"), "k"), Ok(()));
    }
}
