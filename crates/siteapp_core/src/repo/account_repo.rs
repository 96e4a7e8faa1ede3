//! Account repository contract and SQLite implementation.
//!
//! # Invariants
//! - `*_ci` lookups compare with SQLite `NOCASE` (ASCII case folding).
//! - `find_by_username` is an exact, case-sensitive match.
//! - When several accounts share an email, the oldest one wins.

use super::{RepoError, RepoResult};
use crate::db::SharedConnection;
use crate::model::account::{Account, AccountId, NewAccount};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    password_hash,
    is_staff,
    is_superuser,
    created_at,
    last_login_at
FROM accounts";

/// Repository interface for account storage and lookups.
pub trait AccountRepository {
    fn create_account(&self, account: &NewAccount) -> RepoResult<AccountId>;
    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;
    fn find_by_email_ci(&self, email: &str) -> RepoResult<Option<Account>>;
    fn username_exists_ci(&self, username: &str) -> RepoResult<bool>;
    fn email_exists_ci(&self, email: &str) -> RepoResult<bool>;
    fn record_login(&self, id: AccountId) -> RepoResult<()>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn find_one(&self, filter_sql: &str, value: &str) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} {filter_sql}"))?;
        let row = stmt
            .query_row([value], |row| Ok(parse_account_row(row)))
            .optional()?;
        row.transpose()
    }

    fn exists(&self, filter_sql: &str, value: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM accounts {filter_sql});"),
            [value],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &NewAccount) -> RepoResult<AccountId> {
        account.validate()?;

        // Self-registration never grants staff or superuser flags.
        self.conn.execute(
            "INSERT INTO accounts (
                username,
                email,
                password_hash,
                is_staff,
                is_superuser
            ) VALUES (?1, ?2, ?3, 0, 0);",
            params![
                account.username.as_str(),
                account.email.as_deref(),
                account.password_hash.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_account_row(row)))
            .optional()?;
        row.transpose()
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        self.find_one("WHERE username = ?1 COLLATE BINARY;", username)
    }

    fn find_by_email_ci(&self, email: &str) -> RepoResult<Option<Account>> {
        self.find_one(
            "WHERE email = ?1 COLLATE NOCASE ORDER BY id ASC LIMIT 1;",
            email,
        )
    }

    fn username_exists_ci(&self, username: &str) -> RepoResult<bool> {
        self.exists("WHERE username = ?1 COLLATE NOCASE", username)
    }

    fn email_exists_ci(&self, email: &str) -> RepoResult<bool> {
        self.exists("WHERE email = ?1 COLLATE NOCASE", email)
    }

    fn record_login(&self, id: AccountId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE accounts
             SET last_login_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::AccountNotFound(id));
        }

        Ok(())
    }
}

/// Account repository over a [`SharedConnection`].
///
/// Each call takes the connection lock for one query and releases it before
/// returning, so password hashing between calls never blocks other requests.
#[derive(Clone)]
pub struct SharedAccountRepository {
    db: SharedConnection,
}

impl SharedAccountRepository {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }

    fn with<T>(
        &self,
        f: impl FnOnce(&SqliteAccountRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        self.db.with(|conn| f(&SqliteAccountRepository::new(conn)))
    }
}

impl AccountRepository for SharedAccountRepository {
    fn create_account(&self, account: &NewAccount) -> RepoResult<AccountId> {
        self.with(|repo| repo.create_account(account))
    }

    fn get_account(&self, id: AccountId) -> RepoResult<Option<Account>> {
        self.with(|repo| repo.get_account(id))
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        self.with(|repo| repo.find_by_username(username))
    }

    fn find_by_email_ci(&self, email: &str) -> RepoResult<Option<Account>> {
        self.with(|repo| repo.find_by_email_ci(email))
    }

    fn username_exists_ci(&self, username: &str) -> RepoResult<bool> {
        self.with(|repo| repo.username_exists_ci(username))
    }

    fn email_exists_ci(&self, email: &str) -> RepoResult<bool> {
        self.with(|repo| repo.email_exists_ci(email))
    }

    fn record_login(&self, id: AccountId) -> RepoResult<()> {
        self.with(|repo| repo.record_login(id))
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    Ok(Account {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        is_staff: parse_flag(row, "is_staff")?,
        is_superuser: parse_flag(row, "is_superuser")?,
        created_at: row.get("created_at")?,
        last_login_at: row.get("last_login_at")?,
    })
}

fn parse_flag(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in accounts.{column}"
        ))),
    }
}
