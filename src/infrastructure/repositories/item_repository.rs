//! Item Repository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Item, ItemRepository};
use crate::infrastructure::database::{has_sqlstate, FOREIGN_KEY_VIOLATION};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    owner_id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL item repository implementation.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, AppError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, owner_id, title, created_at FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn create(&self, item: &Item) -> Result<Item, AppError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (id, owner_id, title, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, title, created_at
            "#,
        )
        .bind(item.id)
        .bind(item.owner_id)
        .bind(&item.title)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if has_sqlstate(&e, FOREIGN_KEY_VIOLATION) {
                AppError::NotFound(format!("Owner with id {} not found", item.owner_id))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.into())
    }
}
