//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [session]
//! auth_type = "session_db_auth"
//! duration_secs = 3600
//! cookie_name = "_my_session_id"
//! database_path = "/var/lib/tessera/sessions.db"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_session::{AuthenticatorConfig, DEFAULT_COOKIE_NAME, SessionDuration, StoreBackend};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Every field is optional so partial layers (project-local overrides,
/// environment) can be merged on top of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Session settings (the `[session]` section).
    pub session: SessionConfig,
}

impl TesseraConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: TesseraConfig) {
        self.session.merge(other.session);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Section
// ─────────────────────────────────────────────────────────────────────────────

/// Raw `[session]` settings as written in a file or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Backend selector (`session_auth`, `session_exp_auth`, `session_db_auth`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    /// Session lifetime in seconds; zero or negative disables expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<i64>,

    /// Cookie carrying the session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_name: Option<String>,

    /// SQLite database file for the persistent backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Overlay every field that `other` sets.
    pub fn merge(&mut self, other: SessionConfig) {
        if other.auth_type.is_some() {
            self.auth_type = other.auth_type;
        }
        if other.duration_secs.is_some() {
            self.duration_secs = other.duration_secs;
        }
        if other.cookie_name.is_some() {
            self.cookie_name = other.cookie_name;
        }
        if other.database_path.is_some() {
            self.database_path = other.database_path;
        }
    }

    /// The selected auth type, falling back to [`AuthType::Session`] when
    /// absent or unrecognized.
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
            .as_deref()
            .and_then(AuthType::from_name)
            .unwrap_or_default()
    }

    /// Turn raw settings into concrete values.
    ///
    /// `default_database` is used when no `database_path` is configured.
    pub fn resolve(&self, default_database: &Path) -> ResolvedSession {
        let auth_type = self.auth_type();
        let duration = if auth_type.expires() {
            SessionDuration::from_signed_secs(self.duration_secs.unwrap_or(0))
        } else {
            SessionDuration::DISABLED
        };

        ResolvedSession {
            auth_type,
            duration,
            cookie_name: self
                .cookie_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            database_path: self
                .database_path
                .clone()
                .unwrap_or_else(|| default_database.to_path_buf()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Type
// ─────────────────────────────────────────────────────────────────────────────

/// Which session flavour the service runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthType {
    /// In-memory sessions that never expire.
    #[default]
    Session,
    /// In-memory sessions with a lifetime.
    SessionExp,
    /// SQLite-backed sessions with a lifetime.
    SessionDb,
}

impl AuthType {
    /// Parse a selector value. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "session_auth" | "memory" => Some(AuthType::Session),
            "session_exp_auth" | "expiring" => Some(AuthType::SessionExp),
            "session_db_auth" | "database" | "db" => Some(AuthType::SessionDb),
            _ => None,
        }
    }

    /// Canonical selector value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Session => "session_auth",
            AuthType::SessionExp => "session_exp_auth",
            AuthType::SessionDb => "session_db_auth",
        }
    }

    /// Storage backend this auth type uses.
    pub fn backend(&self) -> StoreBackend {
        match self {
            AuthType::Session | AuthType::SessionExp => StoreBackend::Memory,
            AuthType::SessionDb => StoreBackend::Sqlite,
        }
    }

    /// Whether the configured duration applies.
    pub fn expires(&self) -> bool {
        !matches!(self, AuthType::Session)
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved session settings, ready to build a store and authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    /// Selected auth type.
    pub auth_type: AuthType,
    /// Effective lifetime (always disabled for [`AuthType::Session`]).
    pub duration: SessionDuration,
    /// Cookie carrying the session id.
    pub cookie_name: String,
    /// Database file (only used by the SQLite backend).
    pub database_path: PathBuf,
}

impl ResolvedSession {
    /// Storage backend to construct.
    pub fn backend(&self) -> StoreBackend {
        self.auth_type.backend()
    }

    /// Authenticator settings.
    pub fn authenticator_config(&self) -> AuthenticatorConfig {
        AuthenticatorConfig::new()
            .with_duration(self.duration)
            .with_cookie_name(self.cookie_name.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> PathBuf {
        PathBuf::from("/tmp/default.db")
    }

    #[test]
    fn test_empty_config_resolves_to_simplest_backend() {
        let resolved = TesseraConfig::new().session.resolve(&db());
        assert_eq!(resolved.auth_type, AuthType::Session);
        assert_eq!(resolved.backend(), StoreBackend::Memory);
        assert_eq!(resolved.duration, SessionDuration::DISABLED);
        assert_eq!(resolved.cookie_name, DEFAULT_COOKIE_NAME);
        assert_eq!(resolved.database_path, db());
    }

    #[test]
    fn test_parse_session_section() {
        let config = TesseraConfig::from_toml(
            r#"
[session]
auth_type = "session_db_auth"
duration_secs = 60
cookie_name = "sid"
database_path = "/data/sessions.db"
"#,
        )
        .unwrap();

        let resolved = config.session.resolve(&db());
        assert_eq!(resolved.auth_type, AuthType::SessionDb);
        assert_eq!(resolved.backend(), StoreBackend::Sqlite);
        assert_eq!(resolved.duration, SessionDuration::from_secs(60));
        assert_eq!(resolved.cookie_name, "sid");
        assert_eq!(resolved.database_path, PathBuf::from("/data/sessions.db"));
    }

    #[test]
    fn test_plain_session_auth_ignores_duration() {
        let mut config = TesseraConfig::new();
        config.session.duration_secs = Some(60);

        let resolved = config.session.resolve(&db());
        assert_eq!(resolved.auth_type, AuthType::Session);
        assert!(!resolved.duration.is_enabled());
    }

    #[test]
    fn test_negative_duration_disables_expiry() {
        let mut config = TesseraConfig::new();
        config.session.auth_type = Some("session_exp_auth".into());
        config.session.duration_secs = Some(-30);

        assert_eq!(config.session.resolve(&db()).duration, SessionDuration::DISABLED);
    }

    #[test]
    fn test_unknown_auth_type_falls_back() {
        let mut config = TesseraConfig::new();
        config.session.auth_type = Some("basic_auth".into());
        assert_eq!(config.session.auth_type(), AuthType::Session);
    }

    #[test]
    fn test_auth_type_aliases() {
        assert_eq!(AuthType::from_name("DB"), Some(AuthType::SessionDb));
        assert_eq!(AuthType::from_name(" expiring "), Some(AuthType::SessionExp));
        assert_eq!(AuthType::from_name("memory"), Some(AuthType::Session));
        assert_eq!(AuthType::from_name(""), None);
        assert_eq!(AuthType::SessionExp.to_string(), "session_exp_auth");
    }

    #[test]
    fn test_merge_overlays_set_fields_only() {
        let mut base = TesseraConfig::from_toml(
            r#"
[session]
auth_type = "session_exp_auth"
duration_secs = 100
cookie_name = "base"
"#,
        )
        .unwrap();
        let overlay = TesseraConfig::from_toml(
            r#"
[session]
duration_secs = 5
"#,
        )
        .unwrap();

        base.merge(overlay);
        assert_eq!(base.session.auth_type.as_deref(), Some("session_exp_auth"));
        assert_eq!(base.session.duration_secs, Some(5));
        assert_eq!(base.session.cookie_name.as_deref(), Some("base"));
    }

    #[test]
    fn test_toml_roundtrip_skips_unset_fields() {
        let mut config = TesseraConfig::new();
        config.session.duration_secs = Some(30);

        let text = config.to_toml().unwrap();
        assert!(text.contains("duration_secs = 30"));
        assert!(!text.contains("cookie_name"));
        assert_eq!(TesseraConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_authenticator_config() {
        let mut config = TesseraConfig::new();
        config.session.auth_type = Some("session_exp_auth".into());
        config.session.duration_secs = Some(10);
        config.session.cookie_name = Some("sid".into());

        let auth = config.session.resolve(&db()).authenticator_config();
        assert_eq!(auth.duration, SessionDuration::from_secs(10));
        assert_eq!(auth.cookie_name, "sid");
    }
}
