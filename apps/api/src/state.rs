use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::middleware::rate_limit::RateLimiter;
use crate::providers::{build_provider, AiProvider, ProviderError};

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; read-only afterwards apart from the limiter's counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Pluggable AI backend. Mock or live, chosen by `AI_PROVIDER`.
    pub provider: Arc<dyn AiProvider>,
    pub limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProviderError> {
        let provider = build_provider(&config)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Lets tests inject a provider without going through `AI_PROVIDER`.
    pub fn with_provider(config: Config, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute)),
            config: Arc::new(config),
            provider,
            started_at: Instant::now(),
        }
    }
}
