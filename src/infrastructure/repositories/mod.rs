//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - User account management
//! - **ItemRepository** - Item lookups by id
//! - **RentalRepository** - Bookings with atomic overlap checks and paginated listings
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{
//!     PgItemRepository, PgRentalRepository, PgUserRepository,
//! };
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let item_repo = PgItemRepository::new(pool.clone());
//!     let rental_repo = PgRentalRepository::new(pool);
//! }
//! ```

pub mod item_repository;
pub mod rental_repository;
pub mod user_repository;

pub use item_repository::PgItemRepository;
pub use rental_repository::PgRentalRepository;
pub use user_repository::PgUserRepository;
