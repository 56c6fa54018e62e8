//! Password hashing contract.

use crate::shared::error::AppError;

/// Turns a plaintext password into a storable hash.
///
/// The hash is opaque to the domain; only the encoder knows its format.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialEncoder: Send + Sync {
    fn encode(&self, plaintext: &str) -> Result<String, AppError>;
}
