//! JSON body extractor that answers malformed bodies with `ApiError`
//!
//! A missing required field becomes a 400 naming the field, any other
//! deserialization failure a 400 validation error, both in the regular
//! error body instead of axum's plain-text 422.

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use recipe_api_shared::ValidationError;
use serde::de::DeserializeOwned;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json` with the API's error shape on rejection
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        Ok(ApiJson(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => data_error(&err.body_text()),
        other => ApiError::Validation(other.body_text()),
    }
}

/// Map a deserialization message onto the offending field when it names one
fn data_error(text: &str) -> ApiError {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);

    if let Some((field, _)) = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
    {
        return ValidationError::new(field, "This field is required").into();
    }

    // Field-level failures are reported as "<field>: <message> at line .."
    if let Some((path, message)) = detail.split_once(": ") {
        if !path.is_empty() && path.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            let message = message.split(" at line ").next().unwrap_or(message);
            return ValidationError::new(path, message).into();
        }
    }

    ApiError::Validation(detail.to_string())
}
