//! User Service
//!
//! Handles user registration and profile management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::services::CredentialEncoder;
use crate::domain::{User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user with a plaintext password
    async fn create_user(&self, profile: NewUserDto, password: &str) -> Result<UserDto, UserError>;

    /// Get user by ID
    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError>;

    /// Overwrite the editable profile fields
    async fn update_user(&self, user_id: i64, update: UpdateProfileDto) -> Result<UserDto, UserError>;

    /// Delete user account
    async fn delete_user(&self, user_id: i64) -> Result<(), UserError>;
}

/// User data transfer object. Never carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub verified: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            description: user.description,
            rating: user.rating,
            verified: user.verified,
        }
    }
}

/// Registration profile
#[derive(Debug, Clone, Default)]
pub struct NewUserDto {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

/// Profile update. Every field is written, so `None` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("User is referenced by existing rentals")]
    HasRentals,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// UserService implementation
pub struct UserServiceImpl<U, E>
where
    U: UserRepository,
    E: CredentialEncoder,
{
    user_repo: Arc<U>,
    encoder: Arc<E>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, E> UserServiceImpl<U, E>
where
    U: UserRepository,
    E: CredentialEncoder,
{
    pub fn new(user_repo: Arc<U>, encoder: Arc<E>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            user_repo,
            encoder,
            id_generator,
        }
    }

    async fn find_existing(&self, user_id: i64) -> Result<User, UserError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::NotFound)
    }
}

#[async_trait]
impl<U, E> UserService for UserServiceImpl<U, E>
where
    U: UserRepository + 'static,
    E: CredentialEncoder + 'static,
{
    async fn create_user(&self, profile: NewUserDto, password: &str) -> Result<UserDto, UserError> {
        let exists = self
            .user_repo
            .email_exists(&profile.email)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        if exists {
            return Err(UserError::DuplicateEmail);
        }

        let password_hash = self
            .encoder
            .encode(password)
            .map_err(|e| UserError::Internal(e.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: self.id_generator.generate(),
            email: profile.email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            description: profile.description,
            rating: None,
            verified: false,
            created_at: now,
            updated_at: now,
        };

        // A concurrent registration can still win the unique index
        let created = self.user_repo.create(&user).await.map_err(|e| match e {
            AppError::Conflict(_) => UserError::DuplicateEmail,
            e => UserError::Internal(e.to_string()),
        })?;

        metrics::record_user_created();
        tracing::info!(user_id = created.id, "User created");

        Ok(UserDto::from(created))
    }

    async fn get_user(&self, user_id: i64) -> Result<UserDto, UserError> {
        self.find_existing(user_id).await.map(UserDto::from)
    }

    async fn update_user(&self, user_id: i64, update: UpdateProfileDto) -> Result<UserDto, UserError> {
        let mut user = self.find_existing(user_id).await?;

        // Email and password are not editable here
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.phone_number = update.phone_number;
        user.description = update.description;

        let updated = self.user_repo.update(&user).await.map_err(|e| match e {
            AppError::NotFound(_) => UserError::NotFound,
            e => UserError::Internal(e.to_string()),
        })?;

        Ok(UserDto::from(updated))
    }

    async fn delete_user(&self, user_id: i64) -> Result<(), UserError> {
        self.find_existing(user_id).await?;

        let referenced = self
            .user_repo
            .has_rentals(user_id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;
        if referenced {
            tracing::warn!(user_id, "Refusing to delete user with rentals");
            return Err(UserError::HasRentals);
        }

        self.user_repo.delete(user_id).await.map_err(|e| match e {
            AppError::NotFound(_) => UserError::NotFound,
            AppError::Conflict(_) => UserError::HasRentals,
            e => UserError::Internal(e.to_string()),
        })?;

        tracing::info!(user_id, "User deleted");
        Ok(())
    }
}
