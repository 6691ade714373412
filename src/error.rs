/// Error types shared across the application
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::store::mirror::MirrorError;
use crate::templates::ErrorTemplate;

/// Errors surfaced by the credential and patient services.
///
/// `Validation`, `DuplicateUsername`, `AuthFailure` and `NotFound` are
/// recovered locally by the handlers (inline form messages); anything
/// else reaches the outermost boundary and renders the generic error
/// page with the detail kept server-side.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation; carries the offending field names
    #[error("invalid fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Registration attempted with a username that already exists
    #[error("username already exists")]
    DuplicateUsername,

    /// Login failed. Deliberately carries no detail: a missing user and
    /// a wrong password must be indistinguishable to the caller.
    #[error("invalid credentials")]
    AuthFailure,

    /// Patient record id does not exist
    #[error("record not found")]
    NotFound,

    /// The document mirror could not be reached. Never propagated out
    /// of the primary write path; logged and swallowed there.
    #[error("document mirror unavailable: {0}")]
    Mirror(#[from] MirrorError),

    /// Relational store failure
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Template rendering failure
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl AppError {
    /// Field list of a validation failure, empty for other variants.
    pub fn invalid_fields(&self) -> &[String] {
        match self {
            AppError::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let page = ErrorTemplate {
            current_user: None,
            flash_messages: vec![],
            has_flash_messages: false,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(%e, "error page render failed");
                (status, "Internal Server Error").into_response()
            }
        }
    }
}
