//! Rental Service
//!
//! Booking creation, status changes and rental listings. The no-overlap
//! rule is enforced atomically by [`RentalRepository::create_if_available`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    BookingOutcome, ItemRepository, Page, PageRequest, Rental, RentalPeriod, RentalRepository,
    RentalStatus, UserRepository,
};
use crate::infrastructure::metrics;
use crate::shared::snowflake::SnowflakeGenerator;

const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Rental service trait
#[async_trait]
pub trait RentalService: Send + Sync {
    /// Book an item; the new rental is always `PENDING`
    async fn create_rental(&self, request: CreateRentalDto) -> Result<RentalDto, RentalError>;

    async fn get_rental(&self, rental_id: i64) -> Result<RentalDto, RentalError>;

    /// Overwrite the status of a rental
    async fn update_rental_status(
        &self,
        rental_id: i64,
        status: RentalStatus,
    ) -> Result<RentalDto, RentalError>;

    /// Rentals where the user is the renter
    async fn get_rentals_by_renter(
        &self,
        renter_id: i64,
        page: PageRequest,
    ) -> Result<Page<RentalDto>, RentalError>;

    /// Rentals of items the user owns
    async fn get_rentals_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<RentalDto>, RentalError>;

    /// Rentals of an item in any of `statuses`; an empty list means every status.
    async fn get_rentals_by_item(
        &self,
        item_id: i64,
        statuses: Vec<RentalStatus>,
    ) -> Result<Vec<RentalDto>, RentalError>;

    /// Rentals of the item that block the given period. Empty means free.
    async fn check_availability(
        &self,
        item_id: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<RentalDto>, RentalError>;
}

/// Booking request
#[derive(Debug, Clone)]
pub struct CreateRentalDto {
    pub item_id: i64,
    pub renter_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
}

/// Rental data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct RentalDto {
    pub id: i64,
    pub item_id: i64,
    pub renter_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub status: RentalStatus,
}

impl From<Rental> for RentalDto {
    fn from(rental: Rental) -> Self {
        Self {
            id: rental.id,
            item_id: rental.item_id,
            renter_id: rental.renter_id,
            start_date: rental.start_date,
            end_date: rental.end_date,
            total_price: rental.total_price,
            deposit_amount: rental.deposit_amount,
            status: rental.status,
        }
    }
}

/// Rental service errors
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("Rental not found")]
    NotFound,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Renter not found")]
    RenterNotFound,

    #[error("Item is already booked for the requested dates")]
    Conflict,

    #[error("Rental end date must not be before its start date")]
    InvalidPeriod,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// RentalService implementation
pub struct RentalServiceImpl<R, I, U>
where
    R: RentalRepository,
    I: ItemRepository,
    U: UserRepository,
{
    rental_repo: Arc<R>,
    item_repo: Arc<I>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
    max_page_size: u32,
}

impl<R, I, U> RentalServiceImpl<R, I, U>
where
    R: RentalRepository,
    I: ItemRepository,
    U: UserRepository,
{
    pub fn new(
        rental_repo: Arc<R>,
        item_repo: Arc<I>,
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            rental_repo,
            item_repo,
            user_repo,
            id_generator,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    async fn ensure_item(&self, item_id: i64) -> Result<(), RentalError> {
        self.item_repo
            .find_by_id(item_id)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?
            .map(|_| ())
            .ok_or(RentalError::ItemNotFound)
    }
}

#[async_trait]
impl<R, I, U> RentalService for RentalServiceImpl<R, I, U>
where
    R: RentalRepository + 'static,
    I: ItemRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_rental(&self, request: CreateRentalDto) -> Result<RentalDto, RentalError> {
        let period = RentalPeriod::new(request.start_date, request.end_date)
            .ok_or(RentalError::InvalidPeriod)?;

        self.ensure_item(request.item_id).await?;
        self.user_repo
            .find_by_id(request.renter_id)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?
            .ok_or(RentalError::RenterNotFound)?;

        let rental = Rental::pending(
            self.id_generator.generate(),
            request.item_id,
            request.renter_id,
            period,
            request.total_price,
            request.deposit_amount,
        );

        let outcome = self
            .rental_repo
            .create_if_available(&rental)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?;

        match outcome {
            BookingOutcome::Created(rental) => {
                metrics::record_rental_created();
                tracing::info!(
                    rental_id = rental.id,
                    item_id = rental.item_id,
                    renter_id = rental.renter_id,
                    "Rental created"
                );
                Ok(RentalDto::from(rental))
            }
            // Item or renter vanished between the lookups and the insert
            BookingOutcome::ItemMissing => Err(RentalError::ItemNotFound),
            BookingOutcome::RenterMissing => Err(RentalError::RenterNotFound),
            BookingOutcome::Overlap => {
                metrics::record_booking_conflict();
                tracing::warn!(
                    item_id = request.item_id,
                    start = %period.start,
                    end = %period.end,
                    "Booking rejected: dates overlap an existing rental"
                );
                Err(RentalError::Conflict)
            }
        }
    }

    async fn get_rental(&self, rental_id: i64) -> Result<RentalDto, RentalError> {
        self.rental_repo
            .find_by_id(rental_id)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?
            .map(RentalDto::from)
            .ok_or(RentalError::NotFound)
    }

    async fn update_rental_status(
        &self,
        rental_id: i64,
        status: RentalStatus,
    ) -> Result<RentalDto, RentalError> {
        let updated = self
            .rental_repo
            .update_status(rental_id, status)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?
            .ok_or(RentalError::NotFound)?;

        tracing::info!(rental_id, status = %status, "Rental status updated");
        Ok(RentalDto::from(updated))
    }

    async fn get_rentals_by_renter(
        &self,
        renter_id: i64,
        page: PageRequest,
    ) -> Result<Page<RentalDto>, RentalError> {
        let page = self
            .rental_repo
            .find_by_renter(renter_id, page.clamped(self.max_page_size))
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?;

        Ok(page.map(RentalDto::from))
    }

    async fn get_rentals_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<RentalDto>, RentalError> {
        let page = self
            .rental_repo
            .find_by_owner(owner_id, page.clamped(self.max_page_size))
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?;

        Ok(page.map(RentalDto::from))
    }

    async fn get_rentals_by_item(
        &self,
        item_id: i64,
        statuses: Vec<RentalStatus>,
    ) -> Result<Vec<RentalDto>, RentalError> {
        self.ensure_item(item_id).await?;

        let mut wanted = Vec::with_capacity(statuses.len());
        for status in statuses {
            if !wanted.contains(&status) {
                wanted.push(status);
            }
        }

        let rentals = self
            .rental_repo
            .find_by_item_and_statuses(item_id, wanted)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?;

        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    async fn check_availability(
        &self,
        item_id: i64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<RentalDto>, RentalError> {
        let period = RentalPeriod::new(start_date, end_date).ok_or(RentalError::InvalidPeriod)?;
        self.ensure_item(item_id).await?;

        let blocking = self
            .rental_repo
            .find_overlapping(item_id, period)
            .await
            .map_err(|e| RentalError::Internal(e.to_string()))?;

        Ok(blocking.into_iter().map(RentalDto::from).collect())
    }
}
