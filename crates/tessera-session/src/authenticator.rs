//! Session lifecycle orchestration: create, resolve, destroy.
//!
//! The authenticator holds no session state of its own. It mints ids, writes
//! and reads through the injected [`SessionStore`], and applies the
//! expiration policy on every lookup. Unknown, expired and malformed ids all
//! come back as the same absent result; only store failures are errors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::config::AuthenticatorConfig;
use crate::error::Result;
use crate::expiry::SessionDuration;
use crate::id::{IdGenerator, UuidGenerator};
use crate::request::SessionRequest;
use crate::store::{Session, SessionStore};

/// Outcome of looking a session id up against the policy.
enum Lookup {
    Missing,
    Expired,
    Live(Session),
}

/// Issues, resolves and destroys session ids over a pluggable store.
#[derive(Clone)]
pub struct SessionAuthenticator {
    store: Arc<dyn SessionStore>,
    ids: Arc<dyn IdGenerator>,
    config: AuthenticatorConfig,
}

impl std::fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("backend", &self.store.backend())
            .field("config", &self.config)
            .finish()
    }
}

impl SessionAuthenticator {
    /// Create an authenticator over `store` issuing random UUID ids.
    pub fn new(store: Arc<dyn SessionStore>, config: AuthenticatorConfig) -> Self {
        Self {
            store,
            ids: Arc::new(UuidGenerator),
            config,
        }
    }

    /// Replace the identifier generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// Configured session lifetime.
    pub fn duration(&self) -> SessionDuration {
        self.config.duration
    }

    // ── Create ──────────────────────────────────────────────────────

    /// Issue a new session for `user_id`.
    ///
    /// Returns `Ok(None)` without touching the store when `user_id` is
    /// missing or empty.
    pub fn create_session(&self, user_id: Option<&str>) -> Result<Option<String>> {
        self.create_session_at(user_id, Utc::now())
    }

    /// Issue a new session recorded as created at `now`.
    pub fn create_session_at(
        &self,
        user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let Some(user_id) = non_empty(user_id) else {
            return Ok(None);
        };

        let session_id = self.ids.new_id();
        self.store.put(&session_id, user_id, now)?;

        debug!(
            session_id = %session_id,
            user_id = %user_id,
            expires_at = ?self.config.duration.expires_at(now),
            "Session created"
        );
        Ok(Some(session_id))
    }

    // ── Resolve ─────────────────────────────────────────────────────

    /// The user a session id currently belongs to.
    ///
    /// Returns `Ok(None)` for a missing, empty, unknown or expired id.
    pub fn resolve(&self, session_id: Option<&str>) -> Result<Option<String>> {
        self.resolve_at(session_id, Utc::now())
    }

    /// Resolve a session id as of `now`.
    pub fn resolve_at(
        &self,
        session_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        Ok(self.session_at(session_id, now)?.map(|s| s.user_id))
    }

    /// The full live record for a session id as of `now`.
    ///
    /// An expired record is removed from the store on the way out. That
    /// removal is housekeeping only: if it fails the failure is logged and
    /// the id still resolves to nothing.
    pub fn session_at(
        &self,
        session_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        let Some(session_id) = non_empty(session_id) else {
            return Ok(None);
        };

        match self.lookup(session_id, now)? {
            Lookup::Live(session) => Ok(Some(session)),
            Lookup::Missing => Ok(None),
            Lookup::Expired => {
                if let Err(e) = self.store.delete(session_id) {
                    warn!(session_id = %session_id, error = %e, "Failed to evict expired session");
                }
                Ok(None)
            }
        }
    }

    // ── Destroy ─────────────────────────────────────────────────────

    /// Destroy a live session.
    ///
    /// Returns `true` only if `session_id` resolved to a live session and
    /// this call removed it. Unknown and already-expired ids return `false`
    /// and leave the store as it was.
    pub fn destroy_session(&self, session_id: Option<&str>) -> Result<bool> {
        self.destroy_session_at(session_id, Utc::now())
    }

    /// Destroy a session, judging liveness as of `now`.
    pub fn destroy_session_at(&self, session_id: Option<&str>, now: DateTime<Utc>) -> Result<bool> {
        let Some(session_id) = non_empty(session_id) else {
            return Ok(false);
        };

        match self.lookup(session_id, now)? {
            Lookup::Live(_) => {
                // A concurrent destroy may win the delete; only one caller sees true.
                let removed = self.store.delete(session_id)?;
                if removed {
                    debug!(session_id = %session_id, "Session destroyed");
                }
                Ok(removed)
            }
            Lookup::Missing | Lookup::Expired => Ok(false),
        }
    }

    // ── Request helpers ─────────────────────────────────────────────

    /// Session id carried by `request` under the configured cookie name.
    pub fn session_id_for<R: SessionRequest + ?Sized>(&self, request: &R) -> Option<String> {
        request
            .cookie(&self.config.cookie_name)
            .filter(|id| !id.is_empty())
    }

    /// The user behind the session cookie on `request`.
    pub fn current_user<R: SessionRequest + ?Sized>(&self, request: &R) -> Result<Option<String>> {
        self.resolve(self.session_id_for(request).as_deref())
    }

    /// Log out: destroy the session named by the cookie on `request`.
    pub fn destroy_session_for<R: SessionRequest + ?Sized>(&self, request: &R) -> Result<bool> {
        self.destroy_session(self.session_id_for(request).as_deref())
    }

    // ── Reaping ─────────────────────────────────────────────────────

    /// Delete every record that has expired as of now.
    ///
    /// Not called by any request path; expiry is otherwise only observed
    /// lazily. Returns the number of records removed.
    pub fn reap_expired(&self) -> Result<usize> {
        self.reap_expired_at(Utc::now())
    }

    /// Delete every record that has expired as of `now`.
    pub fn reap_expired_at(&self, now: DateTime<Utc>) -> Result<usize> {
        if !self.config.duration.is_enabled() {
            return Ok(0);
        }

        let mut removed = 0;
        for session in self.store.scan()? {
            if self.config.duration.is_expired(session.created_at, now)
                && self.store.delete(&session.session_id)?
            {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(count = removed, "Reaped expired sessions");
        }
        Ok(removed)
    }

    fn lookup(&self, session_id: &str, now: DateTime<Utc>) -> Result<Lookup> {
        let Some(session) = self.store.get(session_id)? else {
            trace!(session_id = %session_id, "Session not found");
            return Ok(Lookup::Missing);
        };

        if self.config.duration.is_expired(session.created_at, now) {
            trace!(session_id = %session_id, "Session expired");
            Ok(Lookup::Expired)
        } else {
            Ok(Lookup::Live(session))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
