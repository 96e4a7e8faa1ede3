//! Route handlers.

pub mod auth;
pub mod people;

use crate::error::WebError;
use axum::response::{IntoResponse, Response};

pub async fn health() -> &'static str {
    "ok"
}

pub async fn not_found() -> Response {
    WebError::NotFound.into_response()
}
