//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **UserService**: Registration and profile management
//! - **RentalService**: Bookings, status changes and rental listings

pub mod rental_service;
pub mod user_service;

// Re-export user service types
pub use user_service::{NewUserDto, UpdateProfileDto, UserDto, UserError, UserService, UserServiceImpl};

// Re-export rental service types
pub use rental_service::{
    CreateRentalDto, RentalDto, RentalError, RentalService, RentalServiceImpl,
};
