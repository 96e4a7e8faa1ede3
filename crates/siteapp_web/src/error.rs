//! Handler error type.

use crate::templates;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use log::error;
use siteapp_core::PersonServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure that escapes a handler instead of being shown inline on a form.
#[derive(Debug)]
pub enum WebError {
    NotFound,
    /// Raw failure text, rendered as-is.
    Internal(String),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for WebError {}

impl From<PersonServiceError> for WebError {
    fn from(value: PersonServiceError) -> Self {
        match value {
            PersonServiceError::PersonNotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Html(templates::not_found_page())).into_response()
            }
            Self::Internal(message) => {
                error!("event=request module=web status=error error={message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::error_page(&message)),
                )
                    .into_response()
            }
        }
    }
}
