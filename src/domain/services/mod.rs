//! # Domain Services
//!
//! Contracts for collaborators the domain relies on but does not implement.
//!
//! - **CredentialEncoder**: one-way password hashing

mod credential_encoder;

pub use credential_encoder::CredentialEncoder;

#[cfg(test)]
pub use credential_encoder::MockCredentialEncoder;
