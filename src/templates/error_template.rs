use askama::Template;

use super::base_template::BaseTemplate;
use crate::models::CurrentUser;

/// Generic fault page. Carries no detail on purpose; whatever failed is
/// logged server-side only.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub current_user: Option<CurrentUser>,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

crate::impl_base_template!(ErrorTemplate);
