//! Route guards applied before protected handlers run.
//!
//! Two composable checks: `auth_middleware` requires any session and
//! redirects anonymous requests to the login page; `role_middleware`
//! additionally requires the session's role to match the route's
//! required role, bouncing mismatches to their own dashboard so a
//! forbidden page never reveals what lives behind it. Both are
//! stateless per request and only ever read the session store.

use axum::extract::{FromRef, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Key, SignedCookieJar};

use crate::handlers::helpers::session_from_jar;
use crate::models::{AppState, Role};

pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    if session_from_jar(&state, &jar).is_some() {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// State for a role-restricted route group: the shared app state plus
/// the role the group demands.
#[derive(Clone)]
pub struct RoleGuard {
    pub state: AppState,
    pub required: Role,
}

impl RoleGuard {
    pub fn new(state: &AppState, required: Role) -> Self {
        RoleGuard {
            state: state.clone(),
            required,
        }
    }
}

impl FromRef<RoleGuard> for Key {
    fn from_ref(guard: &RoleGuard) -> Key {
        guard.state.signing_key.clone()
    }
}

pub async fn role_middleware(
    State(guard): State<RoleGuard>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    match session_from_jar(&guard.state, &jar) {
        None => Redirect::to("/login").into_response(),
        Some(session) if session.role == guard.required => next.run(request).await,
        Some(session) => Redirect::to(session.role.dashboard_path()).into_response(),
    }
}
