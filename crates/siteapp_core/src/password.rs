//! Password hashing for accounts.
//!
//! Argon2id with default parameters, stored as PHC strings. Plaintext
//! passwords never leave this module in any other form.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing failed inside argon2.
    HashingFailed(String),
    /// Stored hash is not a parseable PHC string.
    MalformedHash,
    /// Password does not match the stored hash.
    Mismatch,
}

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashingFailed(reason) => write!(f, "password hashing failed: {reason}"),
            Self::MalformedHash => write!(f, "stored password hash is malformed"),
            Self::Mismatch => write!(f, "password does not match"),
        }
    }
}

impl Error for PasswordError {}

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordError::HashingFailed(err.to_string()))
}

/// Checks `password` against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| PasswordError::MalformedHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password, PasswordError};

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("s3nha").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("s3nha"));

        verify_password("s3nha", &hash).unwrap();
        assert_eq!(
            verify_password("outra", &hash),
            Err(PasswordError::Mismatch)
        );
    }

    #[test]
    fn same_password_hashes_differently() {
        assert_ne!(hash_password("abc").unwrap(), hash_password("abc").unwrap());
    }

    #[test]
    fn malformed_hash_is_reported() {
        assert_eq!(
            verify_password("abc", "plaintext"),
            Err(PasswordError::MalformedHash)
        );
    }
}
