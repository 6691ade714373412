use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::{CurrentUser, PatientRecord};

#[derive(Template)]
#[template(path = "patients.html")]
pub struct PatientsTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    /// The page slice currently displayed, not the full result set.
    pub patients: Vec<PatientRecord>,
    pub q: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub error: Option<String>,
}

crate::impl_base_template!(PatientsTemplate);
