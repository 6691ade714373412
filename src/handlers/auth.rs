use axum::extract::{Form, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use serde::Deserialize;

use crate::config::MIN_PASSWORD_LEN;
use crate::error::AppError;
use crate::models::{AppState, Role};
use crate::services::account_service;
use crate::templates::{AboutTemplate, HomeTemplate, LoginTemplate, RegisterTemplate};

use super::helpers::{
    build_template_globals, render_template, session_from_jar, session_token_from_jar,
    TemplateGlobals, SESSION_COOKIE,
};

pub async fn root_get(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(HomeTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
    })
}

pub async fn about_get(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(AboutTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
    })
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub registered: Option<u8>,
}

pub async fn login_get(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    if let Some(session) = session_from_jar(&state, &jar) {
        return Redirect::to(session.role.dashboard_path()).into_response();
    }
    let notice = query
        .registered
        .map(|_| "Registration successful. Please log in.".to_string());
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(LoginTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
        error: None,
        notice,
    })
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match account_service::verify_credentials(&state, &form.username, &form.password) {
        Ok(user) => {
            let token = state.sessions.create(&user.username, user.role);
            let mut cookie = Cookie::new(SESSION_COOKIE, token);
            cookie.set_path("/");
            cookie.set_http_only(true);
            Ok((jar.add(cookie), Redirect::to(user.role.dashboard_path())).into_response())
        }
        Err(AppError::AuthFailure) => {
            let TemplateGlobals {
                current_user,
                flash_messages,
                has_flash_messages,
            } = build_template_globals(&state, &jar);
            Ok(render_template(LoginTemplate {
                current_user,
                flash_messages,
                has_flash_messages,
                error: Some("Invalid username or password".to_string()),
                notice: None,
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn register_get(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    if let Some(session) = session_from_jar(&state, &jar) {
        return Redirect::to(session.role.dashboard_path()).into_response();
    }
    render_register(&state, &jar, None)
}

/// Missing fields deserialize to empty strings and fail validation
/// inline rather than bouncing the request.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

pub async fn register_post(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    // Form-shape checks first; the role string is rejected here at the
    // boundary so nothing downstream sees a value outside the enum.
    let mut problems = Vec::new();
    if form.username.trim().is_empty() {
        problems.push("username");
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        problems.push("password");
    }
    if form.password != form.confirm_password {
        problems.push("confirm_password");
    }
    let role = match Role::parse(&form.role) {
        Ok(role) => Some(role),
        Err(_) => {
            problems.push("role");
            None
        }
    };
    if !problems.is_empty() {
        return Ok(render_register(
            &state,
            &jar,
            Some(format!("Please correct: {}", problems.join(", "))),
        ));
    }
    let role = role.expect("role parsed above");

    match account_service::create_user(&state, &form.username, &form.password, role) {
        Ok(_) => Ok(Redirect::to("/login?registered=1").into_response()),
        Err(AppError::DuplicateUsername) => Ok(render_register(
            &state,
            &jar,
            Some("That username is already taken".to_string()),
        )),
        Err(AppError::Validation(fields)) => Ok(render_register(
            &state,
            &jar,
            Some(format!("Please correct: {}", fields.join(", "))),
        )),
        Err(e) => Err(e),
    }
}

fn render_register(state: &AppState, jar: &SignedCookieJar, error: Option<String>) -> Response {
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(RegisterTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
        error,
        roles: Role::all(),
    })
}

pub async fn logout_get(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    if let Some(token) = session_token_from_jar(&jar) {
        state.sessions.destroy(&token);
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    (jar.remove(removal), Redirect::to("/")).into_response()
}
