//! Request body extractor with field-level validation.

use axum::extract::{FromRequest, Request};
use axum::Json;
use magicstream_core::error::CoreError;
use magicstream_core::validation::field_errors;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its [`Validate`] rules.
///
/// Malformed JSON is rejected with 400 `BAD_REQUEST`; a body that parses but
/// breaks a field rule is rejected with 400 `VALIDATION_ERROR` and a
/// `details` list naming every failed field.
///
/// ```ignore
/// async fn add_movie(ValidJson(input): ValidJson<CreateMovie>) -> AppResult<StatusCode> {
///     // input is well-formed here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Core(CoreError::InvalidFields(field_errors(&errors))))?;

        Ok(ValidJson(value))
    }
}
