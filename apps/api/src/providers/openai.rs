//! Live provider. Forwards every operation to an OpenAI-compatible
//! chat-completions endpoint (openai.com or an Azure OpenAI deployment).
//!
//! Structured operations embed their JSON schema in the system prompt and parse
//! the reply text. If the model ignores the schema the call fails with
//! `ProviderError::Parse`; there is no retry or repair step.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::config::{AzureSettings, OpenAiSettings};
use crate::models::chat::{
    transcript, InsightSignals, InsightsResult, Message, SummaryResult, SummaryStyle,
};
use crate::models::content::{GenOptions, GenResult, TokenUsage};
use crate::models::resume::{ImproveResult, ScoreResult};
use crate::providers::prompts;
use crate::providers::{AiProvider, ProviderError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SUMMARIZE_TEMPERATURE: f32 = 0.3;
const INSIGHTS_TEMPERATURE: f32 = 0.3;
const SCORE_TEMPERATURE: f32 = 0.2;
const IMPROVE_TEMPERATURE: f32 = 0.4;
const GENERATE_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The live model may emit a fractional or out-of-range score; it is clamped
/// before it reaches the caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScore {
    overall_score: f64,
    rationale: String,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
}

/// One completed chat call: reply text plus the upstream token accounting.
struct Completion {
    text: String,
    usage: TokenUsage,
}

/// How requests authenticate against the upstream API.
#[derive(Debug, Clone)]
enum Credential {
    Bearer(String),
    ApiKeyHeader(String),
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    name: &'static str,
    url: String,
    api_version: Option<String>,
    credential: Credential,
    model: String,
}

impl OpenAiProvider {
    /// openai.com (or any compatible server reachable at `base_url`).
    pub fn openai(settings: &OpenAiSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client()?,
            name: "openai",
            url: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_version: None,
            credential: Credential::Bearer(settings.api_key.clone()),
            model: settings.model.clone(),
        })
    }

    /// Azure OpenAI. The deployment name doubles as the model.
    pub fn azure(settings: &AzureSettings) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client()?,
            name: "azure-openai",
            url: format!(
                "{}/openai/deployments/{}/chat/completions",
                settings.endpoint.trim_end_matches('/'),
                settings.deployment
            ),
            api_version: Some(settings.api_version.clone()),
            credential: Credential::ApiKeyHeader(settings.key.clone()),
            model: settings.deployment.clone(),
        })
    }

    /// One chat-completion round trip. No retries: upstream failures surface as-is.
    async fn chat(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Completion, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(version) = &self.api_version {
            request = request.query(&[("api-version", version)]);
        }
        request = match &self.credential {
            Credential::Bearer(key) => request.bearer_auth(key),
            Credential::ApiKeyHeader(key) => request.header("api-key", key),
        };

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let usage = completion.usage.unwrap_or_default();

        debug!(
            provider = self.name,
            "Completion succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens,
            usage.completion_tokens
        );

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(Completion {
            text,
            usage: TokenUsage {
                prompt: usage.prompt_tokens,
                completion: usage.completion_tokens,
                total: usage.total_tokens,
            },
        })
    }

    /// Calls the model and deserializes the reply text as JSON.
    async fn chat_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<T, ProviderError> {
        let completion = self.chat(system, user, temperature).await?;
        if completion.text.trim().is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        parse_model_json(&completion.text)
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn summarize_chat(
        &self,
        messages: &[Message],
        style: SummaryStyle,
    ) -> Result<SummaryResult, ProviderError> {
        self.chat_json(
            &prompts::summarize_system(style),
            &transcript(messages),
            SUMMARIZE_TEMPERATURE,
        )
        .await
    }

    async fn extract_insights(
        &self,
        messages: &[Message],
        signals: InsightSignals,
    ) -> Result<InsightsResult, ProviderError> {
        self.chat_json(
            &prompts::insights_system(signals),
            &transcript(messages),
            INSIGHTS_TEMPERATURE,
        )
        .await
    }

    async fn score_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<ScoreResult, ProviderError> {
        let raw: RawScore = self
            .chat_json(
                &prompts::score_system(),
                &prompts::score_user(resume_text, job_description),
                SCORE_TEMPERATURE,
            )
            .await?;

        Ok(ScoreResult {
            overall_score: clamp_score(raw.overall_score),
            rationale: raw.rationale,
            matched_skills: raw.matched_skills,
            missing_skills: raw.missing_skills,
        })
    }

    async fn improve_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
        target_role: Option<&str>,
    ) -> Result<ImproveResult, ProviderError> {
        self.chat_json(
            &prompts::improve_system(),
            &prompts::improve_user(resume_text, job_description, target_role),
            IMPROVE_TEMPERATURE,
        )
        .await
    }

    async fn generate_content(
        &self,
        prompt: &str,
        opts: &GenOptions,
    ) -> Result<GenResult, ProviderError> {
        let system = prompts::generate_system(opts.tone.as_deref(), opts.length);
        let completion = self.chat(&system, prompt, GENERATE_TEMPERATURE).await?;

        Ok(GenResult {
            generated_text: completion.text,
            tokens_usage: completion.usage,
        })
    }
}

fn build_client() -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    serde_json::from_str(strip_json_fences(text)).map_err(ProviderError::Parse)
}

fn clamp_score(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u32
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::HeaderMap,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::models::chat::Role;

    /// What the stub upstream saw on its last request.
    #[derive(Default)]
    struct Captured {
        body: Option<Value>,
        headers: Option<HeaderMap>,
        query: Option<HashMap<String, String>>,
    }

    #[derive(Clone)]
    struct Stub {
        reply: Value,
        status: axum::http::StatusCode,
        captured: Arc<Mutex<Captured>>,
    }

    async fn completions(
        State(stub): State<Stub>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        let mut captured = stub.captured.lock().unwrap();
        captured.body = Some(body);
        captured.headers = Some(headers);
        captured.query = Some(query);
        (stub.status, Json(stub.reply.clone()))
    }

    /// Serves `reply` on both the openai and azure completion paths; returns the base URL.
    async fn spawn_stub(
        status: axum::http::StatusCode,
        reply: Value,
    ) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let stub = Stub {
            reply,
            status,
            captured: Arc::clone(&captured),
        };
        let app = Router::new()
            .route("/chat/completions", post(completions))
            .route(
                "/openai/deployments/:deployment/chat/completions",
                post(completions),
            )
            .with_state(stub);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn completion_reply(content: &str) -> Value {
        json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42}
        })
    }

    fn openai_provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::openai(&OpenAiSettings {
            api_key: "sk-test".to_string(),
            model: "gpt-4o".to_string(),
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    fn hello() -> Vec<Message> {
        vec![Message {
            role: Role::User,
            content: "Hello".to_string(),
        }]
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(72.4), 72);
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[tokio::test]
    async fn test_summarize_parses_fenced_json_reply() {
        let reply = "```json\n{\"summary\": \"A greeting\", \"keyPoints\": [\"hi\"], \"actionItems\": []}\n```";
        let (base_url, captured) =
            spawn_stub(axum::http::StatusCode::OK, completion_reply(reply)).await;

        let result = openai_provider(&base_url)
            .summarize_chat(&hello(), SummaryStyle::Concise)
            .await
            .unwrap();
        assert_eq!(result.summary, "A greeting");
        assert_eq!(result.key_points, vec!["hi".to_string()]);

        let captured = captured.lock().unwrap();
        let body = captured.body.as_ref().unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user: Hello");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        let headers = captured.headers.as_ref().unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "Bearer sk-test");
    }

    #[tokio::test]
    async fn test_non_json_reply_is_parse_error() {
        let (base_url, _) = spawn_stub(
            axum::http::StatusCode::OK,
            completion_reply("Sure! Here is your summary: it went well."),
        )
        .await;

        let err = openai_provider(&base_url)
            .summarize_chat(&hello(), SummaryStyle::Concise)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_reply_is_empty_content_error() {
        let (base_url, _) =
            spawn_stub(axum::http::StatusCode::OK, json!({"choices": []})).await;

        let err = openai_provider(&base_url)
            .extract_insights(&hello(), InsightSignals::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent), "got {err:?}");
    }

    #[tokio::test]
    async fn test_upstream_error_status_surfaces_message() {
        let (base_url, _) = spawn_stub(
            axum::http::StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
        )
        .await;

        let err = openai_provider(&base_url)
            .generate_content("Write", &GenOptions::default())
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_returns_raw_text_and_upstream_usage() {
        let (base_url, _) =
            spawn_stub(axum::http::StatusCode::OK, completion_reply("Roses are red.")).await;

        let result = openai_provider(&base_url)
            .generate_content("Write a poem", &GenOptions::default())
            .await
            .unwrap();
        assert_eq!(result.generated_text, "Roses are red.");
        assert_eq!(
            result.tokens_usage,
            TokenUsage {
                prompt: 12,
                completion: 30,
                total: 42
            }
        );
    }

    #[tokio::test]
    async fn test_score_is_clamped() {
        let reply = r#"{"overallScore": 117.6, "rationale": "Great", "matchedSkills": ["Rust"], "missingSkills": []}"#;
        let (base_url, _) = spawn_stub(axum::http::StatusCode::OK, completion_reply(reply)).await;

        let result = openai_provider(&base_url)
            .score_resume("Rust engineer with ten years", None)
            .await
            .unwrap();
        assert_eq!(result.overall_score, 100);
        assert_eq!(result.matched_skills, vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn test_azure_wiring_uses_deployment_path_and_api_key_header() {
        let reply = r#"{"improvedBullets": [], "keywordsToAdd": ["rust"], "formattingSuggestions": [], "optimizedVersion": "CV"}"#;
        let (base_url, captured) =
            spawn_stub(axum::http::StatusCode::OK, completion_reply(reply)).await;

        let provider = OpenAiProvider::azure(&AzureSettings {
            endpoint: format!("{base_url}/"),
            key: "azure-key".to_string(),
            deployment: "my-deploy".to_string(),
            api_version: "2024-08-01-preview".to_string(),
        })
        .unwrap();

        let result = provider
            .improve_resume("Resume body text", None, Some("SRE"))
            .await
            .unwrap();
        assert_eq!(result.keywords_to_add, vec!["rust".to_string()]);

        let captured = captured.lock().unwrap();
        assert_eq!(
            captured.query.as_ref().unwrap().get("api-version").map(String::as_str),
            Some("2024-08-01-preview")
        );
        let headers = captured.headers.as_ref().unwrap();
        assert_eq!(headers.get("api-key").unwrap(), "azure-key");
        assert!(headers.get("authorization").is_none());
        assert_eq!(captured.body.as_ref().unwrap()["model"], "my-deploy");
    }
}
