//! Fixed-window rate limiting keyed by client address.
//!
//! Every response carries `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
//! `X-RateLimit-Reset` (seconds until the window rolls over). Rejected requests
//! get a 429 envelope plus `Retry-After`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Prune expired windows once the table grows past this many clients.
const PRUNE_THRESHOLD: usize = 10_000;

const LIMIT_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const REMAINING_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const RESET_HEADER: HeaderName = HeaderName::from_static("x-ratelimit-reset");

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of counting one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_secs: u64,
}

pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, RATE_LIMIT_WINDOW)
    }

    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        // A poisoned lock only means another request panicked mid-update;
        // the counters are still usable.
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        let elapsed = now.duration_since(entry.started);
        let reset_secs = self.window.saturating_sub(elapsed).as_secs_f64().ceil() as u64;

        if entry.count >= self.limit {
            return RateDecision {
                allowed: false,
                limit: self.limit,
                remaining: 0,
                reset_secs,
            };
        }

        entry.count += 1;
        RateDecision {
            allowed: true,
            limit: self.limit,
            remaining: self.limit - entry.count,
            reset_secs,
        }
    }
}

/// Identifies the caller: socket address when the server was started with
/// connect info, else the first `X-Forwarded-For` hop, else one shared bucket.
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "anonymous".to_string())
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
    headers.insert(RESET_HEADER, HeaderValue::from(decision.reset_secs));
}

pub async fn enforce_rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    let decision = limiter.check(&client);

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        tracing::warn!(client = %client, limit = decision.limit, "Rate limit exceeded");
        AppError::RateLimited {
            limit: decision.limit,
            retry_after_secs: decision.reset_secs,
        }
        .into_response()
    };

    apply_headers(response.headers_mut(), &decision);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_counts_down_then_rejects() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        let first = limiter.check_at("1.2.3.4", now);
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert_eq!(first.reset_secs, 60);

        let second = limiter.check_at("1.2.3.4", now);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check_at("1.2.3.4", now + Duration::from_secs(15));
        assert!(!third.allowed);
        assert_eq!(third.reset_secs, 45);
    }

    #[test]
    fn test_clients_have_independent_windows() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_window_rolls_over() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now + Duration::from_secs(59)).allowed);
        let rolled = limiter.check_at("a", now + Duration::from_secs(60));
        assert!(rolled.allowed);
        assert_eq!(rolled.remaining, 0);
    }

    fn app(limit: u32) -> Router {
        let limiter = Arc::new(RateLimiter::per_minute(limit));
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter, enforce_rate_limit))
    }

    fn request() -> axum::http::Request<Body> {
        axum::http::Request::get("/health")
            .header("x-forwarded-for", "10.0.0.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_middleware_sets_headers_and_returns_429() {
        let app = app(1);

        let ok = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.headers()["x-ratelimit-limit"], "1");
        assert_eq!(ok.headers()["x-ratelimit-remaining"], "0");
        assert!(ok.headers().contains_key("x-ratelimit-reset"));

        let limited = app.oneshot(request()).await.unwrap();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(limited.headers().contains_key("retry-after"));
        let bytes = axum::body::to_bytes(limited.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Max 1 requests per 1 minute"));
    }

    #[test]
    fn test_client_key_prefers_forwarded_for_over_anonymous() {
        let req = request();
        assert_eq!(client_key(&req), "10.0.0.1");

        let req: Request = axum::http::Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), "anonymous");
    }
}
