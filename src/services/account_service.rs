//! Account operations against the credential store.

use crate::config::MIN_PASSWORD_LEN;
use crate::error::AppError;
use crate::models::{AppState, Role, UserRecord};
use crate::services::password::{generate_password_hash, verify_password};
use crate::store::sql;

/// Register a new account.
///
/// The duplicate check runs before anything is hashed or written, so a
/// failed registration leaves no partial row. The mirror write happens
/// after the relational insert commits and its failure is logged and
/// swallowed — the relational store is the transaction boundary.
pub fn create_user(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
) -> Result<UserRecord, AppError> {
    let username = username.trim();
    let mut problems = Vec::new();
    if username.is_empty() {
        problems.push("username".to_string());
    }
    if password.len() < MIN_PASSWORD_LEN {
        problems.push("password".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::Validation(problems));
    }

    let record = {
        let conn = state.db.lock().unwrap();
        if sql::find_user(&conn, username)?.is_some() {
            return Err(AppError::DuplicateUsername);
        }
        let record = UserRecord {
            username: username.to_string(),
            password_hash: generate_password_hash(password),
            role,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        sql::insert_user(&conn, &record)?;
        record
    };

    if let Err(e) = state.mirror.insert_user(&record) {
        tracing::warn!(username = %record.username, error = %e, "user mirror write failed");
    }
    Ok(record)
}

pub fn find_by_username(state: &AppState, username: &str) -> Result<Option<UserRecord>, AppError> {
    let conn = state.db.lock().unwrap();
    sql::find_user(&conn, username)
}

/// Check a username/password pair against the credential store.
///
/// An unknown username and a wrong password both come back as the same
/// `AuthFailure`, so the login surface cannot be used to enumerate
/// accounts.
pub fn verify_credentials(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<UserRecord, AppError> {
    let conn = state.db.lock().unwrap();
    match sql::find_user(&conn, username)? {
        Some(user) if verify_password(&user.password_hash, password) => Ok(user),
        _ => Err(AppError::AuthFailure),
    }
}
