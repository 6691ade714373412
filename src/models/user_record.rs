use serde::{Deserialize, Serialize};

use crate::models::Role;

/// One account row in the credential store. Holds only the salted
/// digest, never a plaintext password.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}
