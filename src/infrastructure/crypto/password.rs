//! Argon2id password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

use crate::domain::services::CredentialEncoder;
use crate::shared::error::AppError;

/// Hashes passwords with Argon2id and a random salt, producing PHC strings.
#[derive(Default, Clone)]
pub struct Argon2Encoder {
    argon2: Argon2<'static>,
}

impl Argon2Encoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialEncoder for Argon2Encoder {
    fn encode(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{PasswordHash, PasswordVerifier};

    #[test]
    fn test_encode_produces_verifiable_phc_string() {
        let encoder = Argon2Encoder::new();

        let hash = encoder.encode("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"correct horse", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn test_encode_salts_every_hash() {
        let encoder = Argon2Encoder::new();

        assert_ne!(encoder.encode("same").unwrap(), encoder.encode("same").unwrap());
    }
}
