//! Relational store — row-level operations over the SQLite connection.
//!
//! This is the authoritative store: every write lands here first, and
//! the document mirror only ever sees data that already committed here.

use rusqlite::{params, Connection};

use crate::error::AppError;
use crate::models::{PatientFields, PatientRecord, Role, UserRecord};

/// Create both tables if they do not exist yet.
pub fn init_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            username      TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS patients (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT NOT NULL,
            age               INTEGER NOT NULL,
            gender            TEXT NOT NULL,
            condition         TEXT NOT NULL,
            avg_glucose_level REAL,
            bmi               REAL,
            added_by          TEXT NOT NULL,
            created_at        TEXT NOT NULL
        );",
    )?;
    Ok(())
}

// ═══════════════════════════════════════════
// Users
// ═══════════════════════════════════════════

pub fn insert_user(conn: &Connection, user: &UserRecord) -> Result<(), AppError> {
    conn.execute(
        "INSERT INTO users (username, password_hash, role, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user.username, user.password_hash, user.role.as_str(), user.created_at],
    )?;
    Ok(())
}

/// Exact-match lookup; username comparison is byte-exact (BINARY
/// collation), no normalization.
pub fn find_user(conn: &Connection, username: &str) -> Result<Option<UserRecord>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT username, password_hash, role, created_at FROM users WHERE username = ?1",
    )?;

    let result = stmt.query_row(params![username], |row| {
        let role_s: String = row.get(2)?;
        let role = Role::parse(&role_s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(UserRecord {
            username: row.get(0)?,
            password_hash: row.get(1)?,
            role,
            created_at: row.get(3)?,
        })
    });

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_users(conn: &Connection) -> Result<Vec<UserRecord>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT username, password_hash, role, created_at FROM users ORDER BY username",
    )?;
    let rows = stmt.query_map([], |row| {
        let role_s: String = row.get(2)?;
        let role = Role::parse(&role_s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(UserRecord {
            username: row.get(0)?,
            password_hash: row.get(1)?,
            role,
            created_at: row.get(3)?,
        })
    })?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

// ═══════════════════════════════════════════
// Patients
// ═══════════════════════════════════════════

fn patient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        condition: row.get(4)?,
        avg_glucose_level: row.get(5)?,
        bmi: row.get(6)?,
        added_by: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const PATIENT_COLUMNS: &str =
    "id, name, age, gender, condition, avg_glucose_level, bmi, added_by, created_at";

/// Insert a new patient row and return its assigned id.
pub fn insert_patient(
    conn: &Connection,
    fields: &PatientFields,
    added_by: &str,
    created_at: &str,
) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO patients (name, age, gender, condition, avg_glucose_level, bmi, added_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            fields.name,
            fields.age,
            fields.gender,
            fields.condition,
            fields.avg_glucose_level,
            fields.bmi,
            added_by,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a patient row with an explicit id (dataset import path).
/// Returns false when the id already exists.
pub fn insert_patient_with_id(conn: &Connection, record: &PatientRecord) -> Result<bool, AppError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO patients (id, name, age, gender, condition, avg_glucose_level, bmi, added_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id,
            record.name,
            record.age,
            record.gender,
            record.condition,
            record.avg_glucose_level,
            record.bmi,
            record.added_by,
            record.created_at,
        ],
    )?;
    Ok(changed > 0)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<PatientRecord>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"
    ))?;
    let result = stmt.query_row(params![id], patient_from_row);
    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List patients, optionally restricted to names containing `filter`.
pub fn list_patients(conn: &Connection, filter: Option<&str>) -> Result<Vec<PatientRecord>, AppError> {
    let mut records = Vec::new();
    match filter {
        Some(needle) if !needle.trim().is_empty() => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PATIENT_COLUMNS} FROM patients WHERE name LIKE '%' || ?1 || '%' ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![needle.trim()], patient_from_row)?;
            for row in rows {
                records.push(row?);
            }
        }
        _ => {
            let mut stmt =
                conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"))?;
            let rows = stmt.query_map([], patient_from_row)?;
            for row in rows {
                records.push(row?);
            }
        }
    }
    Ok(records)
}

/// Update an existing row; returns the number of rows touched (0 when
/// the id is absent).
pub fn update_patient(conn: &Connection, id: i64, fields: &PatientFields) -> Result<usize, AppError> {
    let changed = conn.execute(
        "UPDATE patients
         SET name = ?1, age = ?2, gender = ?3, condition = ?4, avg_glucose_level = ?5, bmi = ?6
         WHERE id = ?7",
        params![
            fields.name,
            fields.age,
            fields.gender,
            fields.condition,
            fields.avg_glucose_level,
            fields.bmi,
            id,
        ],
    )?;
    Ok(changed)
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<usize, AppError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(changed)
}

pub fn count_patients(conn: &Connection) -> Result<i64, AppError> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::password::generate_password_hash;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample_fields(name: &str) -> PatientFields {
        PatientFields {
            name: name.to_string(),
            age: 54,
            gender: "F".to_string(),
            condition: "Hypertension".to_string(),
            avg_glucose_level: Some(101.5),
            bmi: None,
        }
    }

    #[test]
    fn user_insert_and_exact_match_lookup() {
        let conn = test_conn();
        let user = UserRecord {
            username: "Doc1".to_string(),
            password_hash: generate_password_hash("pw12345"),
            role: Role::Doctor,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        insert_user(&conn, &user).unwrap();

        let found = find_user(&conn, "Doc1").unwrap().expect("exact match");
        assert_eq!(found.role, Role::Doctor);
        // Case-sensitive exact match: no normalization on lookup.
        assert!(find_user(&conn, "doc1").unwrap().is_none());
    }

    #[test]
    fn patient_crud_round_trip() {
        let conn = test_conn();
        let id = insert_patient(&conn, &sample_fields("Jane Doe"), "doc1", "2026-01-01T00:00:00Z")
            .unwrap();

        let record = get_patient(&conn, id).unwrap().expect("inserted row");
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.added_by, "doc1");

        let mut updated = sample_fields("Jane Doe");
        updated.age = 55;
        assert_eq!(update_patient(&conn, id, &updated).unwrap(), 1);
        assert_eq!(get_patient(&conn, id).unwrap().unwrap().age, 55);

        assert_eq!(delete_patient(&conn, id).unwrap(), 1);
        assert!(get_patient(&conn, id).unwrap().is_none());
        assert_eq!(delete_patient(&conn, id).unwrap(), 0);
    }

    #[test]
    fn list_supports_name_filter() {
        let conn = test_conn();
        insert_patient(&conn, &sample_fields("Jane Doe"), "doc1", "t").unwrap();
        insert_patient(&conn, &sample_fields("John Roe"), "doc1", "t").unwrap();

        assert_eq!(list_patients(&conn, None).unwrap().len(), 2);
        let filtered = list_patients(&conn, Some("Jane")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Jane Doe");
        assert!(list_patients(&conn, Some("  ")).unwrap().len() == 2);
    }

    #[test]
    fn explicit_id_insert_reports_conflicts() {
        let conn = test_conn();
        let record = PatientRecord {
            id: 9001,
            name: "Dataset Row".to_string(),
            age: 61,
            gender: "M".to_string(),
            condition: "Stroke history".to_string(),
            avg_glucose_level: Some(228.69),
            bmi: Some(36.6),
            added_by: "dataset_import".to_string(),
            created_at: "t".to_string(),
        };
        assert!(insert_patient_with_id(&conn, &record).unwrap());
        assert!(!insert_patient_with_id(&conn, &record).unwrap());
        assert_eq!(count_patients(&conn).unwrap(), 1);
    }
}
