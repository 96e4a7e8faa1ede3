//! One connection shared by every thread of the process.
//!
//! # Invariants
//! - The lock is held only for the duration of the closure passed to
//!   [`SharedConnection::with`]; callers keep slow work (password hashing)
//!   outside of it.

use super::{DbError, DbResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SharedConnection {
    conn: Arc<Mutex<Connection>>,
}

impl SharedConnection {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::SharedConnection;
    use crate::db::{open_db_in_memory, DbError, DbResult};

    #[test]
    fn clones_share_one_database() {
        let shared = SharedConnection::new(open_db_in_memory().unwrap());
        let other = shared.clone();

        shared
            .with(|conn| -> DbResult<()> {
                conn.execute("INSERT INTO people (name) VALUES ('Maria');", [])?;
                Ok(())
            })
            .unwrap();

        let count: i64 = other
            .with(|conn| {
                conn.query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
                    .map_err(DbError::from)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared = SharedConnection::new(open_db_in_memory().unwrap());
        let poisoner = shared.clone();
        let _ = std::thread::spawn(move || {
            poisoner.with(|_| -> DbResult<()> { panic!("boom") })
        })
        .join();

        assert!(matches!(
            shared.with(|_| -> DbResult<()> { Ok(()) }),
            Err(DbError::LockPoisoned)
        ));
    }
}
