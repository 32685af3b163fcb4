//! Argon2 hashing for passwords and security answers.

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::AppError;

/// Hashes a secret with a fresh random salt.
pub fn hash_secret(secret: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow!("hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verifies a secret against a stored PHC-format hash.
/// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow!("stored hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_secret("hunter2").unwrap();
        assert!(verify_secret("hunter2", &hash).unwrap());
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let hash = hash_secret("hunter2").unwrap();
        assert!(!verify_secret("hunter3", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_secret("hunter2").unwrap();
        let b = hash_secret("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        assert!(verify_secret("hunter2", "not-a-phc-string").is_err());
    }
}
