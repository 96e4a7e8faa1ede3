//! Request-scoped session context.
//!
//! Handlers receive the caller's session explicitly through these
//! extractors instead of reading any process-global login state.

use crate::session::{FlashMessage, SessionAccount, SessionToken};
use crate::state::AppState;
use crate::LOGIN_PATH;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use log::info;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};

pub const SESSION_COOKIE: &str = "siteapp_session";

/// Session view for the current request; `account` is `None` when anonymous.
#[derive(Clone)]
pub struct RequestContext {
    cookies: Cookies,
    token: Option<SessionToken>,
    pub account: Option<SessionAccount>,
}

impl RequestContext {
    /// Starts a fresh session for `account`, replacing any previous one.
    pub async fn log_in(&mut self, state: &AppState, account: SessionAccount) {
        if let Some(previous) = self.token.take() {
            state.sessions.destroy_session(&previous).await;
        }

        let account_id = account.id;
        let token = state.sessions.create_session(account.clone()).await;
        let mut cookie = Cookie::new(SESSION_COOKIE, token.clone());
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        self.cookies.add(cookie);

        self.token = Some(token);
        self.account = Some(account);
        info!("event=session_start module=web status=ok account_id={account_id}");
    }

    /// Ends the session, if any, and clears the cookie.
    pub async fn log_out(&mut self, state: &AppState) {
        if let Some(token) = self.token.take() {
            state.sessions.destroy_session(&token).await;
            let mut cookie = Cookie::from(SESSION_COOKIE);
            cookie.set_path("/");
            self.cookies.remove(cookie);
        }
        if let Some(account) = self.account.take() {
            info!(
                "event=session_end module=web status=ok account_id={}",
                account.id
            );
        }
    }

    pub async fn flash(&self, state: &AppState, message: FlashMessage) {
        if let Some(token) = &self.token {
            state.sessions.push_flash(token, message).await;
        }
    }

    pub async fn take_flashes(&self, state: &AppState) -> Vec<FlashMessage> {
        match &self.token {
            Some(token) => state.sessions.take_flashes(token).await,
            None => Vec::new(),
        }
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let presented = cookies
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());
        let account = match &presented {
            Some(token) => state.sessions.get_account(token).await,
            None => None,
        };
        // A cookie pointing at a dead session counts as anonymous.
        let token = presented.filter(|_| account.is_some());

        Ok(Self {
            cookies,
            token,
            account,
        })
    }
}

/// Extractor for routes that require a logged-in account.
///
/// Anonymous requests are redirected to the login page.
pub struct LoggedIn {
    pub context: RequestContext,
    pub account: SessionAccount,
}

impl FromRequestParts<AppState> for LoggedIn {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_request_parts(parts, state).await?;
        match context.account.clone() {
            Some(account) => Ok(Self { context, account }),
            None => Err(Redirect::to(LOGIN_PATH).into_response()),
        }
    }
}
