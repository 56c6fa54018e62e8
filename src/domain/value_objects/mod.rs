//! # Value Objects
//!
//! Immutable value types used across the domain.

mod page;
mod period;

pub use page::{Page, PageRequest};
pub use period::RentalPeriod;
