//! Rental Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::request::{
    AvailabilityQueryParams, CreateRentalRequest, ItemRentalsQueryParams, PageQueryParams,
    UpdateRentalStatusRequest,
};
use crate::application::dto::response::{AvailabilityResponse, RentalResponse};
use crate::application::services::RentalError;
use crate::domain::PageRequest;
use crate::presentation::http::extractors::{ApiQuery, EntityId, ValidatedJson};
use crate::shared::error::{AppError, ErrorKind, FieldError};
use crate::startup::AppState;

impl From<RentalError> for AppError {
    fn from(err: RentalError) -> Self {
        match err {
            RentalError::NotFound => {
                AppError::Rejected(ErrorKind::RentalNotFound, "Rental not found".into())
            }
            RentalError::ItemNotFound => {
                AppError::Rejected(ErrorKind::ItemNotFound, "Item not found".into())
            }
            RentalError::RenterNotFound => {
                AppError::Rejected(ErrorKind::RenterNotFound, "Renter not found".into())
            }
            RentalError::Conflict => AppError::Rejected(
                ErrorKind::BookingConflict,
                "Item is already booked for the requested dates".into(),
            ),
            RentalError::InvalidPeriod => AppError::Validation(vec![FieldError {
                field: "end_date".into(),
                message: "Дата окончания не может быть раньше даты начала".into(),
            }]),
            RentalError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Page request from query parameters, falling back to the configured page size.
pub(super) fn page_request(state: &AppState, query: &PageQueryParams) -> PageRequest {
    PageRequest::new(
        query.page.unwrap_or(0),
        query
            .size
            .unwrap_or(state.settings.pagination.default_page_size),
    )
}

/// Book an item
pub async fn create_rental(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<RentalResponse>), AppError> {
    let rental = state.rentals.create_rental(body.into()).await?;
    Ok((StatusCode::CREATED, Json(RentalResponse::from(rental))))
}

/// Get rental by ID
pub async fn get_rental(
    State(state): State<AppState>,
    EntityId(rental_id): EntityId,
) -> Result<Json<RentalResponse>, AppError> {
    let rental = state.rentals.get_rental(rental_id).await?;
    Ok(Json(RentalResponse::from(rental)))
}

/// Change rental status
pub async fn update_rental_status(
    State(state): State<AppState>,
    EntityId(rental_id): EntityId,
    ValidatedJson(body): ValidatedJson<UpdateRentalStatusRequest>,
) -> Result<Json<RentalResponse>, AppError> {
    let rental = state
        .rentals
        .update_rental_status(rental_id, body.status)
        .await?;

    Ok(Json(RentalResponse::from(rental)))
}

/// Rentals of an item, optionally narrowed to some statuses
pub async fn get_item_rentals(
    State(state): State<AppState>,
    EntityId(item_id): EntityId,
    ApiQuery(query): ApiQuery<ItemRentalsQueryParams>,
) -> Result<Json<Vec<RentalResponse>>, AppError> {
    let rentals = state
        .rentals
        .get_rentals_by_item(item_id, query.status)
        .await?;

    Ok(Json(rentals.into_iter().map(RentalResponse::from).collect()))
}

/// Whether an item is free for the requested period
pub async fn check_availability(
    State(state): State<AppState>,
    EntityId(item_id): EntityId,
    ApiQuery(query): ApiQuery<AvailabilityQueryParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let blocking = state
        .rentals
        .check_availability(item_id, query.start, query.end)
        .await?;

    Ok(Json(AvailabilityResponse::new(
        item_id,
        query.start,
        query.end,
        blocking,
    )))
}
