use std::collections::BTreeMap;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::envelope::ErrorEnvelope;
use crate::providers::ProviderError;

const GENERIC_SERVER_MESSAGE: &str = "An internal server error occurred.";

/// Why the auth guard turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingKey,
    InvalidKey,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::MissingKey => f.write_str("Missing X-API-KEY header."),
            AuthFailure::InvalidKey => f.write_str("Invalid API key."),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Request validation failed.")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("Request body exceeds maximum allowed size.")]
    PayloadTooLarge,

    #[error("Rate limit exceeded. Max {limit} requests per 1 minute. Please retry after {retry_after_secs} seconds.")]
    RateLimited { limit: u32, retry_after_secs: u64 },

    #[error("{0}")]
    Unauthorized(AuthFailure),

    #[error("Route {0} not found")]
    NotFound(String),

    #[error("{message}")]
    Request { status: StatusCode, message: String },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Convenience for a single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut details = BTreeMap::new();
        details.insert(field.into(), vec![message.into()]);
        AppError::Validation(details)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Request { status, .. } => *status,
            AppError::Provider(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            _ if self.status().is_server_error() => "INTERNAL_ERROR",
            _ => "REQUEST_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // 5xx messages are replaced so upstream and internal details never leak.
        let message = if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request error: {self:?}");
            GENERIC_SERVER_MESSAGE.to_string()
        } else {
            tracing::warn!(status = status.as_u16(), code, "Request error: {self}");
            self.to_string()
        };

        let retry_after = match &self {
            AppError::RateLimited {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        };

        let details = match self {
            AppError::Validation(details) => Some(details),
            _ => None,
        };

        let mut response = (
            status,
            Json(ErrorEnvelope::new(code, message, details)),
        )
            .into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
