use serde::{Deserialize, Serialize};

/// A patient record as stored in the relational store and mirrored into
/// the document store. Demographic and medical fields follow the
/// reference stroke dataset; `added_by` records the doctor account that
/// created the row.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub id: i64,
    pub name: String,
    pub age: u32,
    /// One of "M", "F", "Other"
    pub gender: String,
    pub condition: String,
    pub avg_glucose_level: Option<f64>,
    pub bmi: Option<f64>,
    pub added_by: String,
    pub created_at: String,
}

/// Raw, unvalidated form input for a patient record. Everything is a
/// string straight off the wire; the patient service turns it into
/// typed fields or a validation error listing what was wrong.
#[derive(Clone, Debug, Default)]
pub struct PatientDraft {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub condition: String,
    pub avg_glucose_level: String,
    pub bmi: String,
}

/// Validated field values ready to be written.
#[derive(Clone, Debug)]
pub struct PatientFields {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub condition: String,
    pub avg_glucose_level: Option<f64>,
    pub bmi: Option<f64>,
}
