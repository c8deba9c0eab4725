use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

const MAX_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Message {
    pub role: Role,
    #[validate(length(min = 1, max = 50000, message = "must be between 1 and 50000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Concise => "concise",
            SummaryStyle::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub style: SummaryStyle,
}

impl Validate for SummarizeRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_messages(&self.messages)
    }
}

/// Which insight signals to compute. Every toggle defaults to on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(default)]
pub struct InsightSignals {
    pub sentiment: bool,
    pub topics: bool,
    pub entities: bool,
}

impl Default for InsightSignals {
    fn default() -> Self {
        Self {
            sentiment: true,
            topics: true,
            entities: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InsightsRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub signals: InsightSignals,
}

impl Validate for InsightsRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_messages(&self.messages)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sentiment {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResult {
    pub sentiment: Option<Sentiment>,
    pub topics: Vec<String>,
    pub entities: Vec<String>,
    pub risks: Vec<String>,
    pub follow_ups: Vec<String>,
}

/// Count first, then each message. A bad count is reported alone so the
/// `messages` key never holds both a field error and per-item errors.
fn validate_messages(messages: &[Message]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if messages.is_empty() || messages.len() > MAX_MESSAGES {
        let mut error = ValidationError::new("length");
        error.message = Some(Cow::Borrowed("must contain between 1 and 200 messages"));
        errors.add("messages", error);
        return Err(errors);
    }

    let items: BTreeMap<usize, Box<ValidationErrors>> = messages
        .iter()
        .enumerate()
        .filter_map(|(index, message)| message.validate().err().map(|e| (index, Box::new(e))))
        .collect();
    if items.is_empty() {
        return Ok(());
    }

    errors
        .errors_mut()
        .insert("messages", ValidationErrorsKind::List(items));
    Err(errors)
}

/// Flattens a conversation into `role: content` lines for a model prompt.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
