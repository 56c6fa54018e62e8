//! Rental entity and repository trait.
//!
//! Maps to the `rentals` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Page, PageRequest, RentalPeriod};
use crate::shared::error::AppError;

/// Booking lifecycle status matching the database VARCHAR constraint.
///
/// No transition graph is enforced: any status may be replaced by any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    #[default]
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    /// Parse the database representation; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "ACTIVE" => Some(Self::Active),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub const ALL: [RentalStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Active,
        Self::Completed,
        Self::Cancelled,
    ];
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking of one item by one renter for a closed time interval.
///
/// Maps to the `rentals` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - item_id: BIGINT NOT NULL REFERENCES items(id)
/// - renter_id: BIGINT NOT NULL REFERENCES users(id)
/// - start_date / end_date: TIMESTAMPTZ NOT NULL
/// - total_price / deposit_amount: NUMERIC(12, 2) NOT NULL
/// - status: VARCHAR(20) NOT NULL DEFAULT 'PENDING'
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: i64,
    pub item_id: i64,
    pub renter_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    /// A freshly requested booking, always `PENDING`.
    pub fn pending(
        id: i64,
        item_id: i64,
        renter_id: i64,
        period: RentalPeriod,
        total_price: Decimal,
        deposit_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            item_id,
            renter_id,
            start_date: period.start,
            end_date: period.end,
            total_price,
            deposit_amount,
            status: RentalStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn period(&self) -> RentalPeriod {
        RentalPeriod {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Whether this booking conflicts with `period`, regardless of status.
    pub fn overlaps(&self, period: &RentalPeriod) -> bool {
        self.period().overlaps(period)
    }
}

/// Result of an atomic booking attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Created(Rental),
    /// Another rental of the item overlaps the requested period.
    Overlap,
    ItemMissing,
    RenterMissing,
}

/// Repository trait for Rental data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Rental>, AppError>;

    /// All rentals of `item_id` whose period overlaps `period`, in id order.
    async fn find_overlapping(
        &self,
        item_id: i64,
        period: RentalPeriod,
    ) -> Result<Vec<Rental>, AppError>;

    /// Rentals of `item_id` in id order, limited to `statuses` unless it is empty.
    async fn find_by_item_and_statuses(
        &self,
        item_id: i64,
        statuses: Vec<RentalStatus>,
    ) -> Result<Vec<Rental>, AppError>;

    /// Insert `rental` unless another rental of the same item overlaps it.
    ///
    /// The overlap check and the insert are atomic: of several concurrent
    /// calls with overlapping periods at most one returns
    /// [`BookingOutcome::Created`].
    async fn create_if_available(&self, rental: &Rental) -> Result<BookingOutcome, AppError>;

    /// Overwrite the status; `None` if the rental does not exist.
    async fn update_status(
        &self,
        id: i64,
        status: RentalStatus,
    ) -> Result<Option<Rental>, AppError>;

    async fn find_by_renter(
        &self,
        renter_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError>;

    /// Rentals of every item owned by `owner_id`.
    async fn find_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError>;
}
