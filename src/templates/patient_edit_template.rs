use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::{CurrentUser, PatientRecord};

#[derive(Template)]
#[template(path = "patient_edit.html")]
pub struct PatientEditTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub patient: PatientRecord,
    pub error: Option<String>,
}

crate::impl_base_template!(PatientEditTemplate);
