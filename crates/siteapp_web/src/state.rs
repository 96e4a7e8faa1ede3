//! Shared application state.

use crate::error::WebError;
use crate::session::SessionStore;
use rusqlite::Connection;
use siteapp_core::db::DbError;
use siteapp_core::{SharedAccountRepository, SharedConnection};

/// State handed to every handler.
///
/// One SQLite connection serves all requests; handlers lock it only for the
/// synchronous span of their queries.
#[derive(Clone)]
pub struct AppState {
    db: SharedConnection,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self::with_sessions(conn, SessionStore::new())
    }

    pub fn with_sessions(conn: Connection, sessions: SessionStore) -> Self {
        Self {
            db: SharedConnection::new(conn),
            sessions,
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_db<T>(&self, f: impl FnOnce(&Connection) -> T) -> Result<T, WebError> {
        self.db
            .with(|conn| Ok::<_, DbError>(f(conn)))
            .map_err(|err| WebError::Internal(err.to_string()))
    }

    /// Account storage that locks the connection per query.
    pub fn accounts(&self) -> SharedAccountRepository {
        SharedAccountRepository::new(self.db.clone())
    }
}
