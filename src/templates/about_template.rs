use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::CurrentUser;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

crate::impl_base_template!(AboutTemplate);
