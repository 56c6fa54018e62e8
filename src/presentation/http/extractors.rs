//! Custom Extractors
//!
//! Axum extractors that reject with [`AppError`], so every malformed request
//! gets the same JSON error body as a failed service call.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

/// JSON body that is deserialized and then validated.
///
/// Malformed JSON is a 400 `BadRequest`; validation failures are a 400 with
/// field-level messages.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;

        Ok(ValidatedJson(value))
    }
}

/// Numeric id taken from the single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        raw.parse()
            .map(EntityId)
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
    }
}

/// Query string extractor with `AppError` rejections.
///
/// Repeated keys (`?status=A&status=B`) deserialize into a `Vec`.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.to_string()))?;

        Ok(ApiQuery(value))
    }
}
