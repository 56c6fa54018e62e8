//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};
use validator::Validate;

use crate::application::services::{CreateRentalDto, NewUserDto, UpdateProfileDto};
use crate::domain::RentalStatus;
use crate::shared::validation::{money_amount, not_blank};

/// Snowflake id given either as a decimal string or as a JSON integer.
fn snowflake_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(raw) => raw
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id: {raw:?}"))),
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        custom(function = "not_blank", message = "Email не может быть пустым"),
        email(message = "Некорректный формат email"),
        length(max = 255, message = "Email не должен превышать 255 символов")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов"))]
    pub password: String,

    #[validate(
        custom(function = "not_blank", message = "Имя не может быть пустым"),
        length(min = 2, max = 50, message = "Имя должно содержать от 2 до 50 символов")
    )]
    pub first_name: String,

    #[validate(
        custom(function = "not_blank", message = "Фамилия не может быть пустой"),
        length(min = 2, max = 50, message = "Фамилия должна содержать от 2 до 50 символов")
    )]
    pub last_name: String,

    #[validate(length(min = 10, max = 15, message = "Номер телефона должен содержать от 10 до 15 символов"))]
    pub phone_number: Option<String>,

    pub description: Option<String>,
}

impl CreateUserRequest {
    /// Split into the stored profile and the plaintext password.
    pub fn into_parts(self) -> (NewUserDto, String) {
        let profile = NewUserDto {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            description: self.description,
        };
        (profile, self.password)
    }
}

/// Profile update request. Omitted optional fields are cleared.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        custom(function = "not_blank", message = "Имя не может быть пустым"),
        length(min = 2, max = 50, message = "Имя должно содержать от 2 до 50 символов")
    )]
    pub first_name: String,

    #[validate(
        custom(function = "not_blank", message = "Фамилия не может быть пустой"),
        length(min = 2, max = 50, message = "Фамилия должна содержать от 2 до 50 символов")
    )]
    pub last_name: String,

    #[validate(length(min = 10, max = 15, message = "Номер телефона должен содержать от 10 до 15 символов"))]
    pub phone_number: Option<String>,

    pub description: Option<String>,
}

impl From<UpdateUserRequest> for UpdateProfileDto {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            description: req.description,
        }
    }
}

/// Booking request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    #[serde(deserialize_with = "snowflake_id")]
    pub item_id: i64,
    #[serde(deserialize_with = "snowflake_id")]
    pub renter_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(custom(function = "money_amount"))]
    pub total_price: Decimal,

    #[validate(custom(function = "money_amount"))]
    pub deposit_amount: Decimal,
}

impl From<CreateRentalRequest> for CreateRentalDto {
    fn from(req: CreateRentalRequest) -> Self {
        Self {
            item_id: req.item_id,
            renter_id: req.renter_id,
            start_date: req.start_date,
            end_date: req.end_date,
            total_price: req.total_price,
            deposit_amount: req.deposit_amount,
        }
    }
}

/// Rental status change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRentalStatusRequest {
    pub status: RentalStatus,
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQueryParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Item rental listing filter; `?status=PENDING&status=CONFIRMED`
#[derive(Debug, Default, Deserialize)]
pub struct ItemRentalsQueryParams {
    #[serde(default)]
    pub status: Vec<RentalStatus>,
}

/// Availability query parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQueryParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
