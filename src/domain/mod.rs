//! # Domain Layer
//!
//! The domain layer contains the core business rules of the marketplace.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Item, Rental) and repository traits
//! - **value_objects**: Immutable value types (RentalPeriod, PageRequest, Page)
//! - **services**: Contracts for external collaborators (password hashing)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
