//! Validated JSON extractor - Checks the raw body against the request's
//! field schema, then deserializes and runs structural validation.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::config::{MSG_INVALID_FIELDS, MSG_INVALID_ID};
use crate::errors::AppError;
use crate::validation::{check, check_id, RequestSchema};

/// Validated JSON extractor.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use coaching_api::api::extractors::ValidatedJson;
/// use coaching_api::validation::{RequestSchema, Rule, Schema};
///
/// #[derive(Deserialize, Validate)]
/// struct CreateSkillRequest {
///     name: String,
/// }
///
/// impl RequestSchema for CreateSkillRequest {
///     const SCHEMA: Schema = &[("name", Rule::String)];
/// }
///
/// async fn create_skill(ValidatedJson(payload): ValidatedJson<CreateSkillRequest>) {
///     // payload.name is a non-blank string
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + RequestSchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e.body_text(), "unreadable json body");
                AppError::validation(MSG_INVALID_FIELDS)
            })?;

        check(&body, T::SCHEMA)?;

        let value: T = serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "request body does not fit its type");
            AppError::validation(MSG_INVALID_FIELDS)
        })?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let messages = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref().map(|m| m.to_string())))
        .collect::<Vec<_>>();

    if messages.is_empty() {
        MSG_INVALID_FIELDS.to_string()
    } else {
        messages.join(", ")
    }
}

/// Single `:id` path segment that must be a hyphenated UUID.
pub struct PathId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation(MSG_INVALID_ID))?;

        check_id(&raw, MSG_INVALID_ID).map(PathId)
    }
}
