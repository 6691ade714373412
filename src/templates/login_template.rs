use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::CurrentUser;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    /// Generic invalid-credentials message; never says which part failed.
    pub error: Option<String>,
    pub notice: Option<String>,
}

crate::impl_base_template!(LoginTemplate);
