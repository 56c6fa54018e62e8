//! Rental Repository Implementation
//!
//! PostgreSQL implementation of the RentalRepository trait.
//!
//! Booking creation runs in a single transaction that locks the item row
//! before checking for overlaps, so concurrent bookings of the same item are
//! serialized. The `rentals_no_overlap` exclusion constraint backs this up at
//! the schema level.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{
    BookingOutcome, Page, PageRequest, Rental, RentalPeriod, RentalRepository, RentalStatus,
};
use crate::infrastructure::database::{has_sqlstate, EXCLUSION_VIOLATION, FOREIGN_KEY_VIOLATION};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

const RENTAL_COLUMNS: &str = "r.id, r.item_id, r.renter_id, r.start_date, r.end_date, \
     r.total_price, r.deposit_amount, r.status, r.created_at, r.updated_at";

/// Database row representation matching the rentals table schema.
#[derive(Debug, sqlx::FromRow)]
struct RentalRow {
    id: i64,
    item_id: i64,
    renter_id: i64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    total_price: Decimal,
    deposit_amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RentalRow> for Rental {
    type Error = AppError;

    fn try_from(row: RentalRow) -> Result<Self, Self::Error> {
        let status = RentalStatus::parse(&row.status).ok_or_else(|| {
            AppError::Internal(format!("rental {} has unknown status {:?}", row.id, row.status))
        })?;

        Ok(Rental {
            id: row.id,
            item_id: row.item_id,
            renter_id: row.renter_id,
            start_date: row.start_date,
            end_date: row.end_date,
            total_price: row.total_price,
            deposit_amount: row.deposit_amount,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Rentals of item `$1` whose closed period intersects `[$2, $3]`.
fn overlap_query() -> String {
    format!(
        r#"
        SELECT {RENTAL_COLUMNS}
        FROM rentals r
        WHERE r.item_id = $1
          AND r.start_date <= $3
          AND r.end_date >= $2
        ORDER BY r.id
        "#
    )
}

fn into_rentals(rows: Vec<RentalRow>) -> Result<Vec<Rental>, AppError> {
    rows.into_iter().map(Rental::try_from).collect()
}

/// PostgreSQL rental repository implementation.
#[derive(Clone)]
pub struct PgRentalRepository {
    pool: PgPool,
}

impl PgRentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn overlapping_in_tx(
        tx: &mut Transaction<'static, Postgres>,
        item_id: i64,
        period: RentalPeriod,
    ) -> Result<Vec<RentalRow>, sqlx::Error> {
        sqlx::query_as::<_, RentalRow>(&overlap_query())
            .bind(item_id)
            .bind(period.start)
            .bind(period.end)
            .fetch_all(&mut **tx)
            .await
    }
}

#[async_trait]
impl RentalRepository for PgRentalRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Rental>, AppError> {
        let row = sqlx::query_as::<_, RentalRow>(&format!(
            "SELECT {RENTAL_COLUMNS} FROM rentals r WHERE r.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Rental::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        item_id: i64,
        period: RentalPeriod,
    ) -> Result<Vec<Rental>, AppError> {
        let rows = sqlx::query_as::<_, RentalRow>(&overlap_query())
            .bind(item_id)
            .bind(period.start)
            .bind(period.end)
            .fetch_all(&self.pool)
            .await?;

        into_rentals(rows)
    }

    async fn find_by_item_and_statuses(
        &self,
        item_id: i64,
        statuses: Vec<RentalStatus>,
    ) -> Result<Vec<Rental>, AppError> {
        let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_owned()).collect();

        let rows = sqlx::query_as::<_, RentalRow>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS}
            FROM rentals r
            WHERE r.item_id = $1
              AND (cardinality($2::text[]) = 0 OR r.status = ANY($2::text[]))
            ORDER BY r.id
            "#
        ))
        .bind(item_id)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await?;

        into_rentals(rows)
    }

    async fn create_if_available(&self, rental: &Rental) -> Result<BookingOutcome, AppError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        // Serializes bookings per item until commit
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM items WHERE id = $1 FOR UPDATE")
            .bind(rental.item_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(BookingOutcome::ItemMissing);
        }

        let overlapping = Self::overlapping_in_tx(&mut tx, rental.item_id, rental.period()).await?;
        if !overlapping.is_empty() {
            tx.rollback().await?;
            return Ok(BookingOutcome::Overlap);
        }

        let inserted = sqlx::query_as::<_, RentalRow>(
            r#"
            INSERT INTO rentals (id, item_id, renter_id, start_date, end_date,
                                 total_price, deposit_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, item_id, renter_id, start_date, end_date,
                      total_price, deposit_amount, status, created_at, updated_at
            "#,
        )
        .bind(rental.id)
        .bind(rental.item_id)
        .bind(rental.renter_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(rental.total_price)
        .bind(rental.deposit_amount)
        .bind(rental.status.as_str())
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            // Dropping the transaction rolls it back
            Err(e) if has_sqlstate(&e, EXCLUSION_VIOLATION) => return Ok(BookingOutcome::Overlap),
            // The item row is locked, so only the renter can be missing
            Err(e) if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) => {
                return Ok(BookingOutcome::RenterMissing)
            }
            Err(e) => return Err(AppError::Database(e)),
        };

        tx.commit().await?;
        metrics::record_db_query("insert_if_available", "rentals", started.elapsed().as_secs_f64());

        Rental::try_from(row).map(BookingOutcome::Created)
    }

    async fn update_status(
        &self,
        id: i64,
        status: RentalStatus,
    ) -> Result<Option<Rental>, AppError> {
        let row = sqlx::query_as::<_, RentalRow>(
            r#"
            UPDATE rentals
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, item_id, renter_id, start_date, end_date,
                      total_price, deposit_amount, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Rental::try_from).transpose()
    }

    async fn find_by_renter(
        &self,
        renter_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rentals WHERE renter_id = $1")
            .bind(renter_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, RentalRow>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS}
            FROM rentals r
            WHERE r.renter_id = $1
            ORDER BY r.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(renter_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(into_rentals(rows)?, page, total as u64))
    }

    async fn find_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<Rental>, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM rentals r
            JOIN items i ON i.id = r.item_id
            WHERE i.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, RentalRow>(&format!(
            r#"
            SELECT {RENTAL_COLUMNS}
            FROM rentals r
            JOIN items i ON i.id = r.item_id
            WHERE i.owner_id = $1
            ORDER BY r.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(owner_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(into_rentals(rows)?, page, total as u64))
    }
}
