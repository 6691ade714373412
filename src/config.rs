use std::env;
use std::path::Path;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_PATH: &str = "citycare.db";
pub const DEFAULT_MIRROR_URL: &str = "file:citycare_mirror.json";
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_database_path() -> String {
    env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string())
}

/// Connection string for the document mirror. Only `file:` URLs (or bare
/// paths) are dialable; anything else leaves the mirror unavailable.
pub fn get_mirror_url() -> String {
    env::var("MIRROR_URL").unwrap_or_else(|_| DEFAULT_MIRROR_URL.to_string())
}

/// Secret used to sign the session cookie. When unset, a random key is
/// generated per process, which also invalidates cookies on restart.
pub fn get_session_secret() -> Option<String> {
    env::var("SESSION_SECRET").ok().filter(|s| !s.trim().is_empty())
}

pub fn get_host() -> String {
    env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
