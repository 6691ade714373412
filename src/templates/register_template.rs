use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::{CurrentUser, Role};

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub error: Option<String>,
    pub roles: &'static [Role],
}

crate::impl_base_template!(RegisterTemplate);
