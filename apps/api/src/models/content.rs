use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateContentRequest {
    #[validate(length(min = 1, max = 50000, message = "must be between 1 and 50000 characters"))]
    pub prompt: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: ContentLength,
}

/// Generation knobs forwarded to the provider.
#[derive(Debug, Clone, Default)]
pub struct GenOptions {
    pub tone: Option<String>,
    pub length: ContentLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenResult {
    pub generated_text: String,
    pub tokens_usage: TokenUsage,
}
