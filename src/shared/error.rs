//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// A domain rule rejected the request; `kind` tells callers which one.
    #[error("{1}")]
    Rejected(ErrorKind, String),
}

/// Stable error identifiers exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Internal,
    NotFound,
    BadRequest,
    Conflict,
    Validation,
    UserNotFound,
    DuplicateEmail,
    UserHasRentals,
    RentalNotFound,
    ItemNotFound,
    RenterNotFound,
    BookingConflict,
}

impl ErrorKind {
    /// Numeric code in the response body. Generic kinds use 100xx,
    /// user rules 200xx and rental rules 300xx.
    pub fn code(self) -> u16 {
        match self {
            Self::Internal => 10000,
            Self::NotFound => 10001,
            Self::BadRequest => 10002,
            Self::Conflict => 10005,
            Self::Validation => 10007,
            Self::UserNotFound => 20001,
            Self::DuplicateEmail => 20002,
            Self::UserHasRentals => 20003,
            Self::RentalNotFound => 30001,
            Self::ItemNotFound => 30002,
            Self::RenterNotFound => 30003,
            Self::BookingConflict => 30004,
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest | Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound
            | Self::UserNotFound
            | Self::RentalNotFound
            | Self::ItemNotFound
            | Self::RenterNotFound => StatusCode::NOT_FOUND,
            Self::Conflict
            | Self::DuplicateEmail
            | Self::UserHasRentals
            | Self::BookingConflict => StatusCode::CONFLICT,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .first()
        .map(|e| format!("{}: {}", e.field, e.message))
        .unwrap_or_else(|| "Validation failed".into())
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Internal(_) | AppError::Database(_) => ErrorKind::Internal,
            AppError::Rejected(kind, _) => *kind,
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        let (message, errors) = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Rejected(_, msg) => (msg, None),
            AppError::Validation(fields) => (summarize(&fields), Some(fields)),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Internal server error".to_string(), None)
            }
        };

        let body = ErrorResponse {
            code: kind.code(),
            kind,
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
