pub mod account_service;
pub mod password;
pub mod patient_service;
pub mod seed_service;
pub mod session;

// Re-export commonly used functions
pub use password::{generate_password_hash, random_session_id, verify_password};
pub use session::{SessionData, SessionStore};
