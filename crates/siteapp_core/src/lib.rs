//! Core domain logic for siteapp.
//! Accounts, person records, and the SQLite storage they live in.

pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;

pub use db::SharedConnection;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId, NewAccount};
pub use model::person::{Person, PersonFields, PersonId};
pub use model::validation::ValidationError;
pub use password::{hash_password, verify_password, PasswordError};
pub use repo::account_repo::{AccountRepository, SharedAccountRepository, SqliteAccountRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountService, LoginError, RegisterError, RegisterRequest};
pub use service::person_service::{PersonForm, PersonService, PersonServiceError};
pub use service::username::{allocate_username, normalize_username, FALLBACK_USERNAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
