//! Item entity and repository trait.
//!
//! Items are managed elsewhere; the rental ledger only needs to resolve an item
//! id and learn who owns it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A rentable object owned by exactly one user.
///
/// Maps to the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Item lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Item>, AppError>;

    /// Insert an item. Fails with `AppError::NotFound` if the owner does not exist.
    async fn create(&self, item: &Item) -> Result<Item, AppError>;
}
