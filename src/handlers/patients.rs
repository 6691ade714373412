//! Patient record pages. Every route here sits behind the Doctor role
//! guard; the handlers only translate forms to service calls and
//! service outcomes back to pages.

use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{AppState, PatientDraft};
use crate::services::patient_service;
use crate::templates::{PatientEditTemplate, PatientsTemplate};

use super::helpers::{
    build_template_globals, push_flash, render_template, session_from_jar, TemplateGlobals,
};

const PER_PAGE: usize = 20;

#[derive(Deserialize, Default)]
pub struct PatientsQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}

pub async fn patients_list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(query): Query<PatientsQuery>,
) -> Result<Response, AppError> {
    render_patients(&state, &jar, &query, None)
}

/// Shared renderer for the register page; `error` carries an inline
/// create-form message when a POST re-renders the page.
fn render_patients(
    state: &AppState,
    jar: &SignedCookieJar,
    query: &PatientsQuery,
    error: Option<String>,
) -> Result<Response, AppError> {
    let filter = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let records = patient_service::list(state, filter)?;

    // Pagination is purely presentational: the store hands back the
    // full filtered set and we slice a page of it for display.
    let total_count = records.len();
    let total_pages = total_count.div_ceil(PER_PAGE).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);
    let start = (page - 1) * PER_PAGE;
    let patients: Vec<_> = records.into_iter().skip(start).take(PER_PAGE).collect();

    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    Ok(render_template(PatientsTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
        patients,
        q: filter.unwrap_or_default().to_string(),
        page,
        total_pages,
        total_count,
        error,
    }))
}

/// Every field defaults so a partial post turns into a validation
/// message instead of a deserialization rejection.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub condition: String,
    pub avg_glucose_level: String,
    pub bmi: String,
}

impl From<PatientForm> for PatientDraft {
    fn from(form: PatientForm) -> Self {
        PatientDraft {
            name: form.name,
            age: form.age,
            gender: form.gender,
            condition: form.condition,
            avg_glucose_level: form.avg_glucose_level,
            bmi: form.bmi,
        }
    }
}

pub async fn patients_create(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<PatientForm>,
) -> Result<Response, AppError> {
    let Some(session) = session_from_jar(&state, &jar) else {
        return Ok(Redirect::to("/login").into_response());
    };
    let draft = PatientDraft::from(form);
    match patient_service::create(&state, &draft, &session.username) {
        Ok(record) => {
            push_flash(&state, &jar, &format!("Patient record #{} created", record.id));
            Ok(Redirect::to("/patients").into_response())
        }
        Err(AppError::Validation(fields)) => render_patients(
            &state,
            &jar,
            &PatientsQuery::default(),
            Some(format!("Please correct: {}", fields.join(", "))),
        ),
        Err(e) => Err(e),
    }
}

pub async fn patient_edit_get(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(patient) = patient_service::get(&state, id)? else {
        push_flash(&state, &jar, "Patient record not found");
        return Ok(Redirect::to("/patients").into_response());
    };
    let TemplateGlobals {
        current_user,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    Ok(render_template(PatientEditTemplate {
        current_user,
        flash_messages,
        has_flash_messages,
        patient,
        error: None,
    }))
}

pub async fn patient_update(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PatientForm>,
) -> Result<Response, AppError> {
    let draft = PatientDraft::from(form);
    match patient_service::update(&state, id, &draft) {
        Ok(record) => {
            push_flash(&state, &jar, &format!("Patient record #{} updated", record.id));
            Ok(Redirect::to("/patients").into_response())
        }
        Err(AppError::NotFound) => {
            push_flash(&state, &jar, "Patient record not found");
            Ok(Redirect::to("/patients").into_response())
        }
        Err(AppError::Validation(fields)) => {
            let Some(patient) = patient_service::get(&state, id)? else {
                push_flash(&state, &jar, "Patient record not found");
                return Ok(Redirect::to("/patients").into_response());
            };
            let TemplateGlobals {
                current_user,
                flash_messages,
                has_flash_messages,
            } = build_template_globals(&state, &jar);
            Ok(render_template(PatientEditTemplate {
                current_user,
                flash_messages,
                has_flash_messages,
                patient,
                error: Some(format!("Please correct: {}", fields.join(", "))),
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn patient_delete(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match patient_service::delete(&state, id) {
        Ok(()) => {
            push_flash(&state, &jar, &format!("Patient record #{id} deleted"));
            Ok(Redirect::to("/patients").into_response())
        }
        Err(AppError::NotFound) => {
            push_flash(&state, &jar, "Patient record not found");
            Ok(Redirect::to("/patients").into_response())
        }
        Err(e) => Err(e),
    }
}
