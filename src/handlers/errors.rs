use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::models::AppState;
use crate::templates::NotFoundTemplate;

use super::helpers::{build_template_globals, TemplateGlobals};

/// Router fallback: anything that matched no route gets the custom
/// not-found page with a 404 status.
pub async fn not_found(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    let page = NotFoundTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
    };
    match page.render() {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(%e, "not-found page render error");
            (StatusCode::NOT_FOUND, "Page Not Found").into_response()
        }
    }
}
