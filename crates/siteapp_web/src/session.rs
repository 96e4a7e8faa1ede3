//! In-memory session storage.
//!
//! Maps opaque session tokens (UUIDv4, stored in a cookie) to the logged-in
//! account and its pending flash messages. Sessions are lost on restart.
//!
//! # Invariants
//! - A session expires `ttl` after login; expired tokens resolve to nobody.
//! - Expired sessions are swept whenever a new one is created, so the table
//!   holds at most the sessions started within one `ttl`.

use log::debug;
use siteapp_core::{Account, AccountId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

pub type SessionToken = String;

/// Two weeks, counted from login.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Account reference carried by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAccount {
    pub id: AccountId,
    pub username: String,
}

impl From<&Account> for SessionAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
        }
    }
}

/// One-shot success message shown on the next rendered page.
///
/// Failures are shown inline on the form that caused them, never flashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug)]
struct Session {
    account: SessionAccount,
    flashes: Vec<FlashMessage>,
    created_at: Instant,
}

impl Session {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}

/// Shared session table.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Sweeps expired sessions, then creates one for `account` and returns
    /// its token.
    pub async fn create_session(&self, account: SessionAccount) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(
                "event=session_sweep module=web status=ok evicted={evicted} active={}",
                sessions.len()
            );
        }

        sessions.insert(
            token.clone(),
            Session {
                account,
                flashes: Vec::new(),
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Account for a live session; expired sessions count as missing.
    pub async fn get_account(&self, token: &str) -> Option<SessionAccount> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|session| !session.is_expired(self.ttl))
            .map(|session| session.account.clone())
    }

    /// Removes the session. Unknown tokens are ignored.
    pub async fn destroy_session(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    /// Queues a flash; dropped when the session does not exist.
    pub async fn push_flash(&self, token: &str, message: FlashMessage) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(token) {
            session.flashes.push(message);
        }
    }

    /// Drains and returns pending flashes.
    pub async fn take_flashes(&self, token: &str) -> Vec<FlashMessage> {
        let mut sessions = self.sessions.write().await;
        sessions
            .get_mut(token)
            .map(|session| std::mem::take(&mut session.flashes))
            .unwrap_or_default()
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
