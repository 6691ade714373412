use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global role assigned to an account at registration.
///
/// Roles form a closed set; unrecognized strings are rejected at the
/// registration boundary so nothing downstream has to re-check stored
/// data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
    Staff,
    Admin,
}

#[derive(Debug, Error)]
#[error("unrecognized role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Stored string form, matching the role values persisted in both
    /// stores ("doctor" | "patient" | "staff" | "admin").
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Exact-match parse of the stored string form.
    pub fn parse(s: &str) -> Result<Role, UnknownRole> {
        match s {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }

    /// Landing page for this role after login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Doctor => "/doctor_dashboard",
            Role::Patient => "/patient_dashboard",
            Role::Staff => "/staff_dashboard",
            Role::Admin => "/admin_dashboard",
        }
    }

    /// Human-readable name shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Doctor => "Doctor",
            Role::Patient => "Patient",
            Role::Staff => "Staff",
            Role::Admin => "Admin",
        }
    }

    /// All defined roles in a stable display order.
    pub fn all() -> &'static [Role] {
        &[Role::Doctor, Role::Patient, Role::Staff, Role::Admin]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_all_stored_forms() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()).unwrap(), *role);
        }
    }

    #[test]
    fn parse_is_exact_match() {
        assert!(Role::parse("Doctor").is_err());
        assert!(Role::parse("DOCTOR").is_err());
        assert!(Role::parse(" doctor").is_err());
        assert!(Role::parse("nurse").is_err());
        assert!(Role::parse("").is_err());
    }

    #[test]
    fn dashboard_paths_are_distinct() {
        let paths: std::collections::HashSet<_> =
            Role::all().iter().map(|r| r.dashboard_path()).collect();
        assert_eq!(paths.len(), Role::all().len());
    }

    #[test]
    fn serde_round_trip_uses_lowercase() {
        let json = serde_json::to_string(&Role::Doctor).unwrap();
        assert_eq!(json, "\"doctor\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Doctor);
    }
}
