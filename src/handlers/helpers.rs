use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::models::{AppState, CurrentUser};
use crate::services::SessionData;

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_token_from_jar(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Resolve the request's session, if any. A cookie that fails signature
/// verification never reaches us (the jar drops it), and a stale token
/// simply misses the session table.
pub fn session_from_jar(state: &AppState, jar: &SignedCookieJar) -> Option<SessionData> {
    let token = session_token_from_jar(jar)?;
    state.sessions.get(&token)
}

pub fn build_current_user(state: &AppState, jar: &SignedCookieJar) -> Option<CurrentUser> {
    let session = session_from_jar(state, jar)?;
    Some(CurrentUser {
        username: session.username,
        role: session.role.as_str().to_string(),
    })
}

pub fn push_flash(state: &AppState, jar: &SignedCookieJar, message: &str) {
    if let Some(sid) = session_token_from_jar(jar) {
        state
            .flash_store
            .lock()
            .unwrap()
            .entry(sid)
            .or_default()
            .push(message.to_string());
    }
}

pub fn take_flash_messages(state: &AppState, jar: &SignedCookieJar) -> Vec<String> {
    let Some(sid) = session_token_from_jar(jar) else {
        return vec![];
    };
    let mut fs = state.flash_store.lock().unwrap();
    fs.remove(&sid).unwrap_or_default()
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, jar: &SignedCookieJar) -> TemplateGlobals {
    let current_user = build_current_user(state, jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
