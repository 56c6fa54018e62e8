//! # Rental Marketplace Library
//!
//! Backend for a peer-to-peer rental marketplace:
//! - User registration and profile management
//! - Item bookings that never overlap for the same item
//! - Rental status tracking and paginated listings
//! - RESTful HTTP API over PostgreSQL or an in-memory store
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database, storage, crypto and metrics implementations
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! rental_marketplace/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database, in-memory store, password hashing, metrics
//! +-- presentation/   HTTP routes, handlers and middleware
//! +-- shared/         Common utilities (errors, validation, snowflake IDs)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
