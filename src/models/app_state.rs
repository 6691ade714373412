use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;

use crate::services::session::SessionStore;
use crate::store::mirror::DocumentMirror;

#[derive(Clone)]
pub struct AppState {
    /// Authoritative relational store. SQLite serializes row access;
    /// the mutex only guards the connection handle itself.
    pub db: Arc<Mutex<Connection>>,
    /// Best-effort document replica of users and patients.
    pub mirror: DocumentMirror,
    pub sessions: SessionStore,
    /// Flash messages keyed by session id, consumed on next render.
    pub flash_store: Arc<Mutex<HashMap<String, Vec<String>>>>,
    pub signing_key: Key,
}

impl AppState {
    pub fn new(conn: Connection, mirror: DocumentMirror, signing_key: Key) -> Self {
        AppState {
            db: Arc::new(Mutex::new(conn)),
            mirror,
            sessions: SessionStore::default(),
            flash_store: Arc::new(Mutex::new(HashMap::new())),
            signing_key,
        }
    }
}

// SignedCookieJar resolves its key through the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.signing_key.clone()
    }
}
