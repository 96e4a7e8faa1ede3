//! HTTP surface for siteapp.
//!
//! # Responsibility
//! - Map the login, registration and person CRUD pages onto axum routes.
//! - Carry per-request session context explicitly through extractors.
//!
//! # Invariants
//! - Every `/usuarios/` route requires a logged-in session.
//! - Database locks are never held across an `.await`.

pub mod context;
pub mod error;
pub mod handlers;
pub mod session;
pub mod state;
pub mod templates;

use axum::routing::get;
use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;
use tower_cookies::CookieManagerLayer;

pub use context::{LoggedIn, RequestContext, SESSION_COOKIE};
pub use error::WebError;
pub use session::{FlashMessage, SessionAccount, SessionStore, DEFAULT_SESSION_TTL};
pub use state::AppState;

pub const LOGIN_PATH: &str = "/";
pub const PEOPLE_PATH: &str = "/usuarios/";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::auth::login_page).post(handlers::auth::login_submit),
        )
        .route(
            "/registrar/",
            get(handlers::auth::register_page).post(handlers::auth::register_submit),
        )
        .route(
            "/logout/",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route("/usuarios/", get(handlers::people::list))
        .route(
            "/usuarios/novo/",
            get(handlers::people::new_form).post(handlers::people::create),
        )
        .route(
            "/usuarios/{id}/editar/",
            get(handlers::people::edit_form).post(handlers::people::update),
        )
        .route(
            "/usuarios/{id}/excluir/",
            get(handlers::people::delete_confirm).post(handlers::people::delete),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Serves the router on `listener` until ctrl-c or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=server_start module=web status=ok addr={addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal module=web status=error signal=SIGINT error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("event=signal module=web status=error signal=SIGTERM error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("event=shutdown module=web status=start signal=SIGINT"),
        _ = terminate => info!("event=shutdown module=web status=start signal=SIGTERM"),
    }
}
