pub mod app_state;
pub mod current_user;
pub mod patient_record;
pub mod role;
pub mod user_record;

pub use app_state::AppState;
pub use current_user::CurrentUser;
pub use patient_record::{PatientDraft, PatientFields, PatientRecord};
pub use role::{Role, UnknownRole};
pub use user_record::UserRecord;
