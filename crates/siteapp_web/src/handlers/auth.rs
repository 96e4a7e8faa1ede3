//! Login, registration and logout.

use crate::context::RequestContext;
use crate::error::WebError;
use crate::session::{FlashMessage, SessionAccount};
use crate::state::AppState;
use crate::templates;
use crate::{LOGIN_PATH, PEOPLE_PATH};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use siteapp_core::{AccountService, RegisterRequest};

/// Login form: `username` holds a username or an email.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Runs Argon2-bound account work on the blocking pool.
async fn run_blocking<T>(f: impl FnOnce() -> T + Send + 'static) -> Result<T, WebError>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| WebError::Internal(format!("account task failed: {err}")))
}

pub async fn login_page() -> Html<String> {
    Html(templates::login_page(None, ""))
}

pub async fn login_submit(
    State(state): State<AppState>,
    mut context: RequestContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let service = AccountService::new(state.accounts());
    let (identifier, password) = (form.username.clone(), form.password.clone());
    let result = run_blocking(move || service.authenticate(&identifier, &password)).await?;

    match result {
        Ok(account) => {
            context
                .log_in(&state, SessionAccount::from(&account))
                .await;
            Ok(Redirect::to(PEOPLE_PATH).into_response())
        }
        Err(err) => Ok(Html(templates::login_page(
            Some(&err.user_message()),
            form.username.trim(),
        ))
        .into_response()),
    }
}

pub async fn register_page() -> Html<String> {
    Html(templates::register_page(None, &RegisterRequest::default()))
}

pub async fn register_submit(
    State(state): State<AppState>,
    mut context: RequestContext,
    Form(request): Form<RegisterRequest>,
) -> Result<Response, WebError> {
    let service = AccountService::new(state.accounts());
    let submitted = request.clone();
    let result = run_blocking(move || service.register(&submitted)).await?;

    match result {
        Ok(account) => {
            context
                .log_in(&state, SessionAccount::from(&account))
                .await;
            context
                .flash(&state, FlashMessage::success("Cadastro realizado com sucesso!"))
                .await;
            Ok(Redirect::to(PEOPLE_PATH).into_response())
        }
        Err(err) => {
            Ok(Html(templates::register_page(Some(&err.user_message()), &request)).into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>, mut context: RequestContext) -> Redirect {
    context.log_out(&state).await;
    Redirect::to(LOGIN_PATH)
}
