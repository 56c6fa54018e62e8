//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database pool and migrations (PostgreSQL)
//! - Repository adapters (PostgreSQL and in-memory)
//! - Password hashing
//! - Prometheus metrics

pub mod crypto;
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod storage;
