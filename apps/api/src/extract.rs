//! `ValidatedJson`: a JSON body extractor that runs `validator` rules before
//! the handler sees the value. Every rejection is converted to `AppError`, so
//! malformed bodies share the envelope used by the rest of the API.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(map_json_rejection)?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(flatten_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn map_json_rejection(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }

    match rejection {
        JsonRejection::JsonDataError(err) => {
            let (field, message) = split_serde_path(&err.body_text());
            AppError::invalid_field(field, message)
        }
        JsonRejection::JsonSyntaxError(err) => AppError::invalid_field("body", err.body_text()),
        other => AppError::Request {
            status: other.status(),
            message: other.body_text(),
        },
    }
}

/// axum reports type errors as `<prefix><path>: <message>`. Pull the path out
/// so it can key the details map; root-level errors land under `body`.
fn split_serde_path(text: &str) -> (String, String) {
    let text = text.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(text);
    match text.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            (path.to_string(), message.to_string())
        }
        _ => ("body".to_string(), text.to_string()),
    }
}

/// Turns validator's nested error tree into `path → messages`, using wire
/// (camelCase) names and `field[index].child` paths.
pub fn flatten_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_errors("", errors, &mut out);
    out
}

fn collect_errors(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let name = camel_case(&field.to_string());
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                out.entry(path)
                    .or_default()
                    .extend(list.iter().map(describe));
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("failed '{}' check", error.code),
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
