//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::web::error::ApiError;

/// JSON extractor that runs `validator` checks on the deserialized body.
///
/// Malformed JSON becomes a 400; a body that deserializes but fails
/// validation becomes a 422 carrying field-level messages.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => body,
            Err(rejection) => {
                return Err(ApiError::bad_request(format!(
                    "Invalid JSON: {}",
                    rejection.body_text()
                )))
            }
        };

        body.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(body))
    }
}

/// Reject values that are empty once surrounding whitespace is removed.
///
/// `length(min = 1)` alone admits all-whitespace names; this closes that
/// hole for display-name fields.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("Must not be blank".into()));
    }
    Ok(())
}
