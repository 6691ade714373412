use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::Role;
use crate::services::password::random_session_id;

/// Server-side state bound to one login.
#[derive(Clone, Debug)]
pub struct SessionData {
    pub username: String,
    pub role: Role,
}

/// Process-local session table keyed by opaque token.
///
/// Sessions live until explicit logout or process exit; there is no
/// idle timeout. A user may hold several concurrent sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn create(&self, username: &str, role: Role) -> String {
        let token = random_session_id();
        self.inner.lock().unwrap().insert(
            token.clone(),
            SessionData {
                username: username.to_string(),
                role,
            },
        );
        token
    }

    pub fn get(&self, token: &str) -> Option<SessionData> {
        self.inner.lock().unwrap().get(token).cloned()
    }

    /// Returns true when a session was actually removed.
    pub fn destroy(&self, token: &str) -> bool {
        self.inner.lock().unwrap().remove(token).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_destroy_lifecycle() {
        let store = SessionStore::default();
        let token = store.create("doc1", Role::Doctor);

        let session = store.get(&token).expect("session should resolve");
        assert_eq!(session.username, "doc1");
        assert_eq!(session.role, Role::Doctor);

        assert!(store.destroy(&token));
        assert!(store.get(&token).is_none());
        assert!(!store.destroy(&token));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let store = SessionStore::default();
        assert!(store.get("deadbeef").is_none());
    }

    #[test]
    fn concurrent_sessions_per_user_are_allowed() {
        let store = SessionStore::default();
        let a = store.create("doc1", Role::Doctor);
        let b = store.create("doc1", Role::Doctor);
        assert_ne!(a, b);
        assert_eq!(store.active_count(), 2);
        store.destroy(&a);
        assert!(store.get(&b).is_some(), "destroying one session must not touch the other");
    }
}
