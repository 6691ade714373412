//! Patient record CRUD with the dual-store write policy.
//!
//! Every mutation validates first, writes the relational store
//! (authoritative), then attempts the document mirror. Mirror failures
//! are logged and swallowed; they never surface to the caller. Role
//! enforcement lives in the route guard upstream — this service trusts
//! its caller.

use crate::error::AppError;
use crate::models::{AppState, PatientDraft, PatientFields, PatientRecord};
use crate::store::sql;

pub const MAX_AGE: u32 = 120;
pub const ALLOWED_GENDERS: &[&str] = &["M", "F", "Other"];

/// Check a raw form draft. On failure the error lists every offending
/// field so the form can flag all of them at once.
pub fn validate(draft: &PatientDraft) -> Result<PatientFields, AppError> {
    let mut problems = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        problems.push("name".to_string());
    }

    let age = match draft.age.trim().parse::<u32>() {
        Ok(age) if age <= MAX_AGE => Some(age),
        _ => {
            problems.push("age".to_string());
            None
        }
    };

    let gender = draft.gender.trim();
    if !ALLOWED_GENDERS.contains(&gender) {
        problems.push("gender".to_string());
    }

    // Condition is optional on the form; records created with only the
    // demographic fields are still valid.
    let condition = match draft.condition.trim() {
        "" => "Unspecified",
        c => c,
    };

    let avg_glucose_level = parse_optional_metric(&draft.avg_glucose_level, "avg_glucose_level", &mut problems);
    let bmi = parse_optional_metric(&draft.bmi, "bmi", &mut problems);

    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    Ok(PatientFields {
        name: name.to_string(),
        age: age.unwrap_or_default(),
        gender: gender.to_string(),
        condition: condition.to_string(),
        avg_glucose_level,
        bmi,
    })
}

fn parse_optional_metric(raw: &str, field: &str, problems: &mut Vec<String>) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            problems.push(field.to_string());
            None
        }
    }
}

pub fn list(state: &AppState, filter: Option<&str>) -> Result<Vec<PatientRecord>, AppError> {
    let conn = state.db.lock().unwrap();
    sql::list_patients(&conn, filter)
}

pub fn get(state: &AppState, id: i64) -> Result<Option<PatientRecord>, AppError> {
    let conn = state.db.lock().unwrap();
    sql::get_patient(&conn, id)
}

pub fn count(state: &AppState) -> Result<i64, AppError> {
    let conn = state.db.lock().unwrap();
    sql::count_patients(&conn)
}

pub fn create(state: &AppState, draft: &PatientDraft, added_by: &str) -> Result<PatientRecord, AppError> {
    let fields = validate(draft)?;
    let created_at = chrono::Utc::now().to_rfc3339();
    let id = {
        let conn = state.db.lock().unwrap();
        sql::insert_patient(&conn, &fields, added_by, &created_at)?
    };
    let record = assemble(id, fields, added_by.to_string(), created_at);

    if let Err(e) = state.mirror.insert_patient(&record, "web_form") {
        tracing::warn!(id, error = %e, "patient mirror write failed");
    }
    Ok(record)
}

pub fn update(state: &AppState, id: i64, draft: &PatientDraft) -> Result<PatientRecord, AppError> {
    let fields = validate(draft)?;
    let existing = {
        let conn = state.db.lock().unwrap();
        let existing = sql::get_patient(&conn, id)?.ok_or(AppError::NotFound)?;
        sql::update_patient(&conn, id, &fields)?;
        existing
    };
    let record = assemble(id, fields, existing.added_by, existing.created_at);

    if let Err(e) = state.mirror.update_patient(&record) {
        tracing::warn!(id, error = %e, "patient mirror update failed");
    }
    Ok(record)
}

pub fn delete(state: &AppState, id: i64) -> Result<(), AppError> {
    {
        let conn = state.db.lock().unwrap();
        if sql::delete_patient(&conn, id)? == 0 {
            return Err(AppError::NotFound);
        }
    }
    if let Err(e) = state.mirror.delete_patient(id) {
        tracing::warn!(id, error = %e, "patient mirror delete failed");
    }
    Ok(())
}

fn assemble(id: i64, fields: PatientFields, added_by: String, created_at: String) -> PatientRecord {
    PatientRecord {
        id,
        name: fields.name,
        age: fields.age,
        gender: fields.gender,
        condition: fields.condition,
        avg_glucose_level: fields.avg_glucose_level,
        bmi: fields.bmi,
        added_by,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mirror::DocumentMirror;
    use axum_extra::extract::cookie::Key;
    use rusqlite::Connection;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open_in_memory().unwrap();
        sql::init_schema(&conn).unwrap();
        let mirror =
            DocumentMirror::connect(&format!("file:{}", dir.path().join("mirror.json").display()));
        (AppState::new(conn, mirror, Key::generate()), dir)
    }

    fn draft(name: &str, age: &str, gender: &str) -> PatientDraft {
        PatientDraft {
            name: name.to_string(),
            age: age.to_string(),
            gender: gender.to_string(),
            condition: "Hypertension".to_string(),
            avg_glucose_level: String::new(),
            bmi: String::new(),
        }
    }

    #[test]
    fn create_writes_both_stores_with_the_same_id() {
        let (state, _dir) = test_state();
        let record = create(&state, &draft("Jane Doe", "54", "F"), "doc1").unwrap();

        assert_eq!(get(&state, record.id).unwrap().unwrap().name, "Jane Doe");
        let docs = state.mirror.patients().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, record.id);
        assert_eq!(docs[0].source, "web_form");
        assert_eq!(docs[0].added_by, "doc1");
    }

    #[test]
    fn non_numeric_age_writes_nothing_to_either_store() {
        let (state, _dir) = test_state();
        let err = create(&state, &draft("Jane Doe", "fifty-four", "F"), "doc1").unwrap_err();
        assert_eq!(err.invalid_fields(), ["age".to_string()]);

        assert_eq!(count(&state).unwrap(), 0);
        assert!(state.mirror.patients().unwrap().is_empty());
    }

    #[test]
    fn validation_lists_every_offending_field() {
        let (state, _dir) = test_state();
        let mut bad = draft("", "999", "X");
        bad.bmi = "abc".to_string();
        let err = create(&state, &bad, "doc1").unwrap_err();
        let fields = err.invalid_fields().to_vec();
        for expected in ["name", "age", "gender", "bmi"] {
            assert!(fields.contains(&expected.to_string()), "missing {expected}");
        }
        assert_eq!(count(&state).unwrap(), 0);
    }

    #[test]
    fn condition_defaults_when_omitted() {
        let (state, _dir) = test_state();
        let mut minimal = draft("Jane Doe", "54", "F");
        minimal.condition = String::new();
        let record = create(&state, &minimal, "doc1").unwrap();
        assert_eq!(record.condition, "Unspecified");
    }

    #[test]
    fn update_preserves_identity_and_provenance() {
        let (state, _dir) = test_state();
        let record = create(&state, &draft("Jane Doe", "54", "F"), "doc1").unwrap();

        let updated = update(&state, record.id, &draft("Jane Doe", "55", "F")).unwrap();
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.age, 55);
        assert_eq!(updated.added_by, "doc1");
        assert_eq!(updated.created_at, record.created_at);

        let docs = state.mirror.patients().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].age, 55);
    }

    #[test]
    fn update_and_delete_of_missing_id_are_not_found() {
        let (state, _dir) = test_state();
        assert!(matches!(
            update(&state, 404, &draft("Jane Doe", "54", "F")),
            Err(AppError::NotFound)
        ));
        assert!(matches!(delete(&state, 404), Err(AppError::NotFound)));
        assert_eq!(count(&state).unwrap(), 0);
    }

    #[test]
    fn delete_removes_from_both_stores() {
        let (state, _dir) = test_state();
        let record = create(&state, &draft("Jane Doe", "54", "F"), "doc1").unwrap();
        delete(&state, record.id).unwrap();
        assert_eq!(count(&state).unwrap(), 0);
        assert!(state.mirror.patients().unwrap().is_empty());
    }

    #[test]
    fn mutations_survive_an_unreachable_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open_in_memory().unwrap();
        sql::init_schema(&conn).unwrap();
        let mirror = DocumentMirror::connect(&format!(
            "file:{}",
            dir.path().join("missing").join("mirror.json").display()
        ));
        let state = AppState::new(conn, mirror, Key::generate());

        let record = create(&state, &draft("Jane Doe", "54", "F"), "doc1").unwrap();
        update(&state, record.id, &draft("Jane Doe", "55", "F")).unwrap();
        delete(&state, record.id).unwrap();
        assert_eq!(count(&state).unwrap(), 0);
    }

    #[test]
    fn list_filter_matches_name_substring() {
        let (state, _dir) = test_state();
        create(&state, &draft("Jane Doe", "54", "F"), "doc1").unwrap();
        create(&state, &draft("John Roe", "61", "M"), "doc1").unwrap();

        let all = list(&state, None).unwrap();
        assert_eq!(all.len(), 2);
        let filtered = list(&state, Some("Doe")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Jane Doe");
    }
}
