use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::dto::Validate;
use crate::error::ApiError;

/// JSON body that has passed its `Validate` checks. Malformed bodies become
/// `400 BAD_REQUEST`, rule violations `400 VALIDATION_ERROR` with field errors.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value.validate().map_err(ApiError::validation_error)?;
        Ok(ValidJson(value))
    }
}
