//! User Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{CreateUserRequest, PageQueryParams, UpdateUserRequest};
use crate::application::dto::response::{RentalResponse, UserResponse};
use crate::application::services::UserError;
use crate::domain::Page;
use crate::presentation::http::extractors::{ApiQuery, EntityId, ValidatedJson};
use crate::shared::error::{AppError, ErrorKind};
use crate::startup::AppState;

use super::rental::page_request;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::Rejected(ErrorKind::UserNotFound, "User not found".into()),
            UserError::DuplicateEmail => AppError::Rejected(
                ErrorKind::DuplicateEmail,
                "User with this email already exists".into(),
            ),
            UserError::HasRentals => AppError::Rejected(
                ErrorKind::UserHasRentals,
                "User cannot be deleted while rentals reference them".into(),
            ),
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let (profile, password) = body.into_parts();
    let user = state.users.create_user(profile, &password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.get_user(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Replace the user's profile fields
pub async fn update_user(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.update_user(user_id, body.into()).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete user
pub async fn delete_user(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
) -> Result<StatusCode, AppError> {
    state.users.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rentals booked by the user
pub async fn get_user_rentals(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ApiQuery(query): ApiQuery<PageQueryParams>,
) -> Result<Json<Page<RentalResponse>>, AppError> {
    let page = state
        .rentals
        .get_rentals_by_renter(user_id, page_request(&state, &query))
        .await?;

    Ok(Json(page.map(RentalResponse::from)))
}

/// Rentals of the items the user owns
pub async fn get_owned_rentals(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ApiQuery(query): ApiQuery<PageQueryParams>,
) -> Result<Json<Page<RentalResponse>>, AppError> {
    let page = state
        .rentals
        .get_rentals_by_owner(user_id, page_request(&state, &query))
        .await?;

    Ok(Json(page.map(RentalResponse::from)))
}
