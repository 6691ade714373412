//! Document mirror — best-effort secondary copy of users and patients.
//!
//! The mirror is a JSON document file with two collections, addressed
//! by a `file:` connection string. It is never authoritative: writes
//! happen after the relational store commits, failures are reported as
//! `MirrorError` for the caller to log and swallow, and divergence
//! between the stores is tolerated by design.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PatientRecord, UserRecord};

#[derive(Debug, Error)]
pub enum MirrorError {
    /// The backing store cannot be reached (bad scheme, missing
    /// directory, I/O failure). Must never block the relational path.
    #[error("mirror unreachable: {0}")]
    Unavailable(String),

    /// The backing file exists but does not parse.
    #[error("mirror data corrupt: {0}")]
    Corrupt(String),
}

/// Mirror copy of a user account document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserDoc {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

/// Mirror copy of a patient document. `source` records which ingestion
/// path produced the document ("web_form" or "csv_import").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatientDoc {
    pub id: i64,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub condition: String,
    pub avg_glucose_level: Option<f64>,
    pub bmi: Option<f64>,
    pub added_by: String,
    pub source: String,
    pub created_at: String,
}

#[derive(Default, Serialize, Deserialize)]
struct MirrorCollections {
    users: Vec<UserDoc>,
    patients: Vec<PatientDoc>,
}

#[derive(Clone)]
pub struct DocumentMirror {
    path: Option<PathBuf>,
}

impl DocumentMirror {
    /// Dial a connection string. `file:<path>` and bare paths are
    /// supported; any other scheme yields a mirror whose operations all
    /// report `Unavailable` — the server keeps running either way.
    pub fn connect(url: &str) -> Self {
        let trimmed = url.trim();
        let path = if let Some(rest) = trimmed.strip_prefix("file:") {
            Some(PathBuf::from(rest))
        } else if trimmed.contains("://") {
            tracing::warn!(url = trimmed, "unsupported mirror scheme; mirror disabled");
            None
        } else if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        };
        DocumentMirror { path }
    }

    pub fn is_available(&self) -> bool {
        self.load().is_ok()
    }

    fn load(&self) -> Result<MirrorCollections, MirrorError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| MirrorError::Unavailable("no mirror target configured".into()))?;
        if !path.exists() {
            // First write creates the file; an absent parent directory
            // will surface on save.
            return Ok(MirrorCollections::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| MirrorError::Unavailable(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| MirrorError::Corrupt(e.to_string()))
    }

    fn save(&self, collections: &MirrorCollections) -> Result<(), MirrorError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| MirrorError::Unavailable("no mirror target configured".into()))?;
        let text = serde_json::to_string_pretty(collections)
            .map_err(|e| MirrorError::Corrupt(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| MirrorError::Unavailable(e.to_string()))
    }

    pub fn insert_user(&self, user: &UserRecord) -> Result<(), MirrorError> {
        let mut collections = self.load()?;
        collections.users.push(UserDoc {
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at.clone(),
        });
        self.save(&collections)
    }

    pub fn insert_patient(&self, record: &PatientRecord, source: &str) -> Result<(), MirrorError> {
        let mut collections = self.load()?;
        collections.patients.push(patient_doc(record, source));
        self.save(&collections)
    }

    /// Replace the document with the given id; inserts when the mirror
    /// missed the original create (divergence repair is opportunistic,
    /// not guaranteed).
    pub fn update_patient(&self, record: &PatientRecord) -> Result<(), MirrorError> {
        let mut collections = self.load()?;
        match collections.patients.iter_mut().find(|doc| doc.id == record.id) {
            Some(doc) => {
                let source = doc.source.clone();
                *doc = patient_doc(record, &source);
            }
            None => collections.patients.push(patient_doc(record, "web_form")),
        }
        self.save(&collections)
    }

    pub fn delete_patient(&self, id: i64) -> Result<(), MirrorError> {
        let mut collections = self.load()?;
        collections.patients.retain(|doc| doc.id != id);
        self.save(&collections)
    }

    pub fn patients(&self) -> Result<Vec<PatientDoc>, MirrorError> {
        Ok(self.load()?.patients)
    }

    pub fn users(&self) -> Result<Vec<UserDoc>, MirrorError> {
        Ok(self.load()?.users)
    }
}

fn patient_doc(record: &PatientRecord, source: &str) -> PatientDoc {
    PatientDoc {
        id: record.id,
        name: record.name.clone(),
        age: record.age,
        gender: record.gender.clone(),
        condition: record.condition.clone(),
        avg_glucose_level: record.avg_glucose_level,
        bmi: record.bmi,
        added_by: record.added_by.clone(),
        source: source.to_string(),
        created_at: record.created_at.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn sample_record(id: i64) -> PatientRecord {
        PatientRecord {
            id,
            name: "Jane Doe".to_string(),
            age: 54,
            gender: "F".to_string(),
            condition: "Hypertension".to_string(),
            avg_glucose_level: None,
            bmi: None,
            added_by: "doc1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn round_trips_patient_documents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mirror.json");
        let mirror = DocumentMirror::connect(&format!("file:{}", target.display()));

        mirror.insert_patient(&sample_record(1), "web_form").unwrap();
        mirror.insert_patient(&sample_record(2), "csv_import").unwrap();

        let docs = mirror.patients().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "web_form");
        assert_eq!(docs[1].source, "csv_import");

        let mut changed = sample_record(1);
        changed.age = 55;
        mirror.update_patient(&changed).unwrap();
        let docs = mirror.patients().unwrap();
        assert_eq!(docs.iter().find(|d| d.id == 1).unwrap().age, 55);
        // Update keeps the document's original source.
        assert_eq!(docs.iter().find(|d| d.id == 1).unwrap().source, "web_form");

        mirror.delete_patient(2).unwrap();
        assert_eq!(mirror.patients().unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_reports_unavailable() {
        let mirror = DocumentMirror::connect("file:/nonexistent-citycare-dir/mirror.json");
        let err = mirror.insert_patient(&sample_record(1), "web_form").unwrap_err();
        assert!(matches!(err, MirrorError::Unavailable(_)));
    }

    #[test]
    fn foreign_scheme_is_unavailable_not_fatal() {
        let mirror = DocumentMirror::connect("mongodb://localhost:27017/hospital_db");
        assert!(!mirror.is_available());
        assert!(matches!(
            mirror.insert_user(&UserRecord {
                username: "doc1".into(),
                password_hash: "pbkdf2:sha256:1$s$h".into(),
                role: Role::Doctor,
                created_at: "t".into(),
            }),
            Err(MirrorError::Unavailable(_))
        ));
    }

    #[test]
    fn corrupt_file_is_distinguished_from_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("mirror.json");
        std::fs::write(&target, "{ not json").unwrap();
        let mirror = DocumentMirror::connect(target.to_str().unwrap());
        assert!(matches!(mirror.patients(), Err(MirrorError::Corrupt(_))));
    }
}
