// Base template trait for inheritance
pub mod base_template;
pub use base_template::BaseTemplate;

// Individual template files
pub mod about_template;
pub mod dashboard_template;
pub mod error_template;
pub mod home_template;
pub mod login_template;
pub mod not_found_template;
pub mod patient_edit_template;
pub mod patients_template;
pub mod register_template;

// Re-export all templates
pub use about_template::AboutTemplate;
pub use dashboard_template::DashboardTemplate;
pub use error_template::ErrorTemplate;
pub use home_template::HomeTemplate;
pub use login_template::LoginTemplate;
pub use not_found_template::NotFoundTemplate;
pub use patient_edit_template::PatientEditTemplate;
pub use patients_template::PatientsTemplate;
pub use register_template::RegisterTemplate;
