//! Login account model.
//!
//! # Invariants
//! - `username` is unique ignoring ASCII case (enforced by the schema).
//! - `email` uniqueness is only checked at registration.
//! - Self-registered accounts never carry elevated privileges.

use super::validation::ValidationError;
use serde::Serialize;

pub type AccountId = i64;

/// A stored login principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: Option<String>,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last successful login.
    pub last_login_at: Option<i64>,
}

/// Insert payload for a self-registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        Ok(())
    }
}
