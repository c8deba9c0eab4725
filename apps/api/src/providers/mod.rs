//! Pluggable AI backends behind every `/v1` route.
//!
//! `MockProvider` is deterministic and does no I/O. `OpenAiProvider` forwards to
//! an OpenAI-compatible chat-completions API (openai.com or Azure OpenAI).
//!
//! `AppState` holds an `Arc<dyn AiProvider>` built once at startup by `build_provider`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ProviderKind};
use crate::models::chat::{InsightSignals, InsightsResult, Message, SummaryResult, SummaryStyle};
use crate::models::content::{GenOptions, GenResult};
use crate::models::resume::{ImproveResult, ScoreResult};

pub mod mock;
pub mod openai;
pub mod prompts;

pub use mock::MockProvider;
pub use openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned empty content")]
    EmptyContent,
}

/// The capability set every backend implements. Swap backends without touching
/// the handlers.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Short label used in startup logs.
    fn name(&self) -> &str;

    async fn summarize_chat(
        &self,
        messages: &[Message],
        style: SummaryStyle,
    ) -> Result<SummaryResult, ProviderError>;

    async fn extract_insights(
        &self,
        messages: &[Message],
        signals: InsightSignals,
    ) -> Result<InsightsResult, ProviderError>;

    async fn score_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<ScoreResult, ProviderError>;

    async fn improve_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
        target_role: Option<&str>,
    ) -> Result<ImproveResult, ProviderError>;

    async fn generate_content(
        &self,
        prompt: &str,
        opts: &GenOptions,
    ) -> Result<GenResult, ProviderError>;
}

/// Picks the backend named by `AI_PROVIDER`. Both `openai` and `azure` map to
/// the live provider; they differ only in endpoint and credential wiring.
pub fn build_provider(config: &Config) -> Result<Arc<dyn AiProvider>, ProviderError> {
    match config.ai_provider {
        ProviderKind::Mock => Ok(Arc::new(MockProvider)),
        ProviderKind::OpenAi => {
            if config.openai.api_key.is_empty() {
                tracing::warn!("AI_PROVIDER=openai but OPENAI_API_KEY is empty; upstream calls will be rejected");
            }
            Ok(Arc::new(OpenAiProvider::openai(&config.openai)?))
        }
        ProviderKind::Azure => {
            if config.azure.endpoint.is_empty() || config.azure.deployment.is_empty() {
                tracing::warn!(
                    "AI_PROVIDER=azure but AZURE_OPENAI_ENDPOINT or AZURE_OPENAI_DEPLOYMENT is empty"
                );
            }
            Ok(Arc::new(OpenAiProvider::azure(&config.azure)?))
        }
    }
}
