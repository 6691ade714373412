use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::error::AppError;
use crate::models::{AppState, Role};
use crate::services::patient_service;
use crate::templates::DashboardTemplate;

use super::helpers::{build_template_globals, render_template, session_from_jar, TemplateGlobals};

pub async fn doctor_dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    // Doctors see the record count so the dashboard links straight into
    // the register with context.
    let patient_count = Some(patient_service::count(&state)?);
    Ok(render_dashboard(&state, &jar, Role::Doctor, patient_count))
}

pub async fn patient_dashboard(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    render_dashboard(&state, &jar, Role::Patient, None)
}

pub async fn staff_dashboard(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    render_dashboard(&state, &jar, Role::Staff, None)
}

pub async fn admin_dashboard(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    render_dashboard(&state, &jar, Role::Admin, None)
}

fn render_dashboard(
    state: &AppState,
    jar: &SignedCookieJar,
    role: Role,
    patient_count: Option<i64>,
) -> Response {
    let Some(session) = session_from_jar(state, jar) else {
        // The guard already enforced this; a vanished session mid-flight
        // just falls back to login.
        return Redirect::to("/login").into_response();
    };
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(DashboardTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
        role_label: role.label(),
        username: session.username,
        patient_count,
    })
}
