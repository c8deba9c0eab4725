use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResumeRequest {
    #[validate(length(min = 10, max = 100000, message = "must be between 10 and 100000 characters"))]
    pub resume_text: String,
    #[validate(length(max = 50000, message = "must be at most 50000 characters"))]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResumeRequest {
    #[validate(length(min = 10, max = 100000, message = "must be between 10 and 100000 characters"))]
    pub resume_text: String,
    #[validate(length(max = 50000, message = "must be at most 50000 characters"))]
    pub job_description: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub target_role: Option<String>,
}

/// ATS score for a resume. `overall_score` is always within 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub overall_score: u32,
    pub rationale: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResult {
    pub improved_bullets: Vec<String>,
    pub keywords_to_add: Vec<String>,
    pub formatting_suggestions: Vec<String>,
    pub optimized_version: String,
}
