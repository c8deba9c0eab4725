use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::chat::{InsightsResult, SummaryResult};
use crate::models::content::GenResult;
use crate::models::resume::{ImproveResult, ScoreResult};
use crate::models::system::HealthStatus;

/// Success envelope: every 2xx body is `{"data": ...}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    HealthEnvelope = DataEnvelope<HealthStatus>,
    SummaryEnvelope = DataEnvelope<SummaryResult>,
    InsightsEnvelope = DataEnvelope<InsightsResult>,
    ScoreEnvelope = DataEnvelope<ScoreResult>,
    ImproveEnvelope = DataEnvelope<ImproveResult>,
    GenEnvelope = DataEnvelope<GenResult>
)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error envelope: `data` is always null and `error` always present.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub data: Option<serde_json::Value>,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Field path → violation messages. Only present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorEnvelope {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<BTreeMap<String, Vec<String>>>,
    ) -> Self {
        Self {
            data: None,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details,
            },
        }
    }
}
