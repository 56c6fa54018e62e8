//! Cryptographic adapters

mod password;

pub use password::Argon2Encoder;
