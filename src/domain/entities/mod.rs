//! # Domain Entities
//!
//! Core domain entities representing the business objects of the marketplace.
//! All entities map directly to their corresponding database tables.
//!
//! - **User**: account with profile data and a hashed credential
//! - **Item**: rentable object owned by one user (referenced by id only)
//! - **Rental**: a booking of an item by a renter for a time interval
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod item;
mod rental;
mod user;

pub use item::{Item, ItemRepository};
pub use rental::{BookingOutcome, Rental, RentalRepository, RentalStatus};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use item::MockItemRepository;
#[cfg(test)]
pub use rental::MockRentalRepository;
#[cfg(test)]
pub use user::MockUserRepository;
