//! Environment variable overrides, applied after all config files.

use std::path::PathBuf;

use crate::TesseraConfig;

/// Session lifetime in seconds.
pub const SESSION_DURATION_ENV: &str = "SESSION_DURATION";

/// Backend selector.
pub const AUTH_TYPE_ENV: &str = "AUTH_TYPE";

/// Session cookie name.
pub const SESSION_NAME_ENV: &str = "SESSION_NAME";

/// SQLite database file.
pub const DATABASE_ENV: &str = "TESSERA_DATABASE";

/// Overlay environment variables from the current process.
pub fn apply_env_overrides(config: &mut TesseraConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Overlay values produced by `lookup` (keyed by variable name).
///
/// A `SESSION_DURATION` that is present but not an integer (including an
/// empty value) counts as `0`. Other empty values are treated as unset.
pub fn apply_overrides_from<F>(config: &mut TesseraConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(raw) = lookup(SESSION_DURATION_ENV) {
        config.session.duration_secs = Some(raw.trim().parse().unwrap_or(0));
    }
    if let Some(auth_type) = get(AUTH_TYPE_ENV) {
        config.session.auth_type = Some(auth_type);
    }
    if let Some(name) = get(SESSION_NAME_ENV) {
        config.session.cookie_name = Some(name);
    }
    if let Some(path) = get(DATABASE_ENV) {
        config.session.database_path = Some(PathBuf::from(path));
    }
}
