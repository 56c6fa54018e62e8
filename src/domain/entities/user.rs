//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a marketplace account. The same account can rent items and own them.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - first_name: VARCHAR(50) NOT NULL
/// - last_name: VARCHAR(50) NOT NULL
/// - phone_number: VARCHAR(15) NULL
/// - description: TEXT NULL
/// - rating: DOUBLE PRECISION NULL
/// - verified: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Email address (unique, immutable after registration)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub phone_number: Option<String>,

    /// Free-text "about me"
    pub description: Option<String>,

    /// Average review score; unset until the first review lands
    pub rating: Option<f64>,

    /// Set once the account passes verification
    pub verified: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email: String::new(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            description: None,
            rating: None,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Check if an email address is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Insert a new user.
    ///
    /// Returns `AppError::Conflict` when the email is already taken.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Overwrite the mutable profile columns of an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Hard-delete a user and the items they own.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Whether any rental references the user, as renter or as owner of the rented item.
    async fn has_rentals(&self, id: i64) -> Result<bool, AppError>;
}
