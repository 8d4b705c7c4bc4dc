//! Configuration for the session authenticator.

use crate::expiry::SessionDuration;

/// Default cookie carrying the session id.
pub const DEFAULT_COOKIE_NAME: &str = "_my_session_id";

/// Configuration for [`SessionAuthenticator`](crate::SessionAuthenticator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    /// Session lifetime; disabled by default.
    pub duration: SessionDuration,

    /// Name of the cookie the session id is read from.
    pub cookie_name: String,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            duration: SessionDuration::DISABLED,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl AuthenticatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session lifetime.
    pub fn with_duration(mut self, duration: SessionDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the session cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}
