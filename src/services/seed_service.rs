//! One-shot import of the reference stroke-dataset CSV into the
//! patient store. Runs from the CLI (`citycare seed <csv>`), never at
//! server startup.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::AppError;
use crate::models::{AppState, PatientRecord};
use crate::store::sql;

#[derive(Debug, Default)]
pub struct SeedReport {
    pub imported: usize,
    pub skipped: usize,
    pub mirror_failures: usize,
}

/// Import patients from the dataset CSV. Rows that do not parse (or
/// collide with an already-imported id) are counted and skipped, not
/// fatal; mirror write failures are counted and never abort the import.
pub fn import_csv(state: &AppState, path: &Path) -> Result<SeedReport, AppError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        AppError::Validation(vec![format!("csv ({}): {}", path.display(), e)])
    })?;
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| AppError::Validation(vec!["csv (empty file)".to_string()]))?;
    let columns = Columns::from_header(header)?;

    let rows: Vec<&str> = lines.filter(|l| !l.trim().is_empty()).collect();
    let bar = ProgressBar::new(rows.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut report = SeedReport::default();
    let created_at = chrono::Utc::now().to_rfc3339();
    for line in rows {
        bar.inc(1);
        let Some(record) = columns.parse_row(line, &created_at) else {
            report.skipped += 1;
            continue;
        };
        let inserted = {
            let conn = state.db.lock().unwrap();
            sql::insert_patient_with_id(&conn, &record)?
        };
        if !inserted {
            report.skipped += 1;
            continue;
        }
        report.imported += 1;
        if let Err(e) = state.mirror.insert_patient(&record, "csv_import") {
            tracing::warn!(id = record.id, error = %e, "seed mirror write failed");
            report.mirror_failures += 1;
        }
    }
    bar.finish_with_message("done");
    Ok(report)
}

/// Column positions resolved from the CSV header. The reference dataset
/// carries more columns than we keep; only these five are required.
struct Columns {
    id: usize,
    gender: usize,
    age: usize,
    avg_glucose_level: usize,
    bmi: usize,
    stroke: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Columns, AppError> {
        let names: Vec<String> = header
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|c| c == name);
        let mut missing = Vec::new();
        let mut required = |name: &str| match find(name) {
            Some(idx) => idx,
            None => {
                missing.push(format!("csv column '{name}'"));
                0
            }
        };
        let columns = Columns {
            id: required("id"),
            gender: required("gender"),
            age: required("age"),
            avg_glucose_level: required("avg_glucose_level"),
            bmi: required("bmi"),
            stroke: required("stroke"),
        };
        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }
        Ok(columns)
    }

    fn parse_row(&self, line: &str, created_at: &str) -> Option<PatientRecord> {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let cell = |idx: usize| cells.get(idx).copied().unwrap_or_default();

        let id: i64 = cell(self.id).parse().ok()?;
        let gender = match cell(self.gender) {
            "Male" | "M" => "M",
            "Female" | "F" => "F",
            "Other" => "Other",
            _ => return None,
        };
        // The dataset stores age as a float for infants ("0.64").
        let age = cell(self.age).parse::<f64>().ok()?;
        if !(0.0..=120.0).contains(&age) {
            return None;
        }
        let condition = match cell(self.stroke) {
            "1" => "Stroke history",
            "0" => "Routine screening",
            _ => return None,
        };

        Some(PatientRecord {
            id,
            name: format!("Patient {id}"),
            age: age.round() as u32,
            gender: gender.to_string(),
            condition: condition.to_string(),
            avg_glucose_level: cell(self.avg_glucose_level).parse().ok(),
            bmi: cell(self.bmi).parse().ok(),
            added_by: "dataset_import".to_string(),
            created_at: created_at.to_string(),
        })
    }
}
