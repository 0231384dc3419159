//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that runs [`Validate`] after deserializing.
///
/// Malformed bodies are rejected with the status axum assigns (400, 415 or
/// 422); field-rule failures are rejected with 422 and per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateEvent {
///     #[validate(length(min = 1, max = 255))]
///     category: String,
/// }
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateEvent>) -> StatusCode {
///     StatusCode::NO_CONTENT
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
