//! Volatile in-process session store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::trace;

use crate::error::{Result, SessionError};
use crate::store::{Session, SessionStore, StoreBackend};

/// Session store backed by a `HashMap`.
///
/// Thread-safe via an internal `RwLock`; lookups share the lock, writes take
/// it exclusively. Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.sessions.write().clear();
    }
}

impl SessionStore for MemoryStore {
    fn put(&self, session_id: &str, user_id: &str, created_at: DateTime<Utc>) -> Result<()> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(session_id) {
            return Err(SessionError::DuplicateId(session_id.to_string()));
        }

        sessions.insert(
            session_id.to_string(),
            Session::new(session_id, user_id, created_at),
        );
        trace!(session_id = %session_id, size = sessions.len(), "Session stored in memory");
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    fn delete(&self, session_id: &str) -> Result<bool> {
        Ok(self.sessions.write().remove(session_id).is_some())
    }

    fn scan(&self) -> Result<Vec<Session>> {
        Ok(self.sessions.read().values().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().len())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
