use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::CurrentUser;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub role_label: &'static str,
    pub username: String,
    /// Shown on the Doctor dashboard only.
    pub patient_count: Option<i64>,
}

crate::impl_base_template!(DashboardTemplate);
