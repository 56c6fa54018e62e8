//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake ids are sent as
//! strings so JavaScript clients keep all 64 bits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::services::{RentalDto, UserDto};
use crate::domain::RentalStatus;

/// User response. The password hash has no field here and never leaves the service layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub verified: bool,
}

impl From<UserDto> for UserResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id.to_string(),
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: dto.phone_number,
            description: dto.description,
            rating: dto.rating,
            verified: dto.verified,
        }
    }
}

/// Rental response
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub id: String,
    pub item_id: String,
    pub renter_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub status: RentalStatus,
}

impl From<RentalDto> for RentalResponse {
    fn from(dto: RentalDto) -> Self {
        Self {
            id: dto.id.to_string(),
            item_id: dto.item_id.to_string(),
            renter_id: dto.renter_id.to_string(),
            start_date: dto.start_date,
            end_date: dto.end_date,
            total_price: dto.total_price,
            deposit_amount: dto.deposit_amount,
            status: dto.status,
        }
    }
}

/// Item availability for a requested period
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub item_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    pub conflicts: Vec<RentalResponse>,
}

impl AvailabilityResponse {
    pub fn new(item_id: i64, start: DateTime<Utc>, end: DateTime<Utc>, blocking: Vec<RentalDto>) -> Self {
        Self {
            item_id: item_id.to_string(),
            start,
            end,
            available: blocking.is_empty(),
            conflicts: blocking.into_iter().map(RentalResponse::from).collect(),
        }
    }
}
