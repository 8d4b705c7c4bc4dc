//! Storage abstraction for session records.
//!
//! A store is a plain key-value repository: it never evaluates expiry and
//! never mints identifiers. The authenticator decides what a record means.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// A stored session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Opaque identifier; the record's key.
    pub session_id: String,

    /// Owning principal.
    pub user_id: String,

    /// When the session was issued.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session record.
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            created_at,
        }
    }
}

/// Which kind of storage backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; lost on restart.
    Memory,
    /// SQLite database; survives restarts.
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Trait for session storage backends.
///
/// Implementations must be safe to share across threads. Operations on a
/// single id are atomic: a `get` racing a `delete` observes either the whole
/// record or nothing.
pub trait SessionStore: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with [`SessionError::DuplicateId`](crate::SessionError::DuplicateId)
    /// if `session_id` is already present; the existing record is untouched.
    fn put(&self, session_id: &str, user_id: &str, created_at: DateTime<Utc>) -> Result<()>;

    /// Fetch a record exactly as stored.
    ///
    /// Return `Ok(None)` if no record exists.
    fn get(&self, session_id: &str) -> Result<Option<Session>>;

    /// Remove a record. Returns `true` if one was removed.
    fn delete(&self, session_id: &str) -> Result<bool>;

    /// All stored records, in no particular order.
    ///
    /// Only bulk maintenance (the reaper) uses this; request paths never do.
    fn scan(&self) -> Result<Vec<Session>>;

    /// Number of stored records, expired ones included.
    fn len(&self) -> Result<usize> {
        Ok(self.scan()?.len())
    }

    /// Check if the store holds no records.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Which backend this is.
    fn backend(&self) -> StoreBackend;
}
