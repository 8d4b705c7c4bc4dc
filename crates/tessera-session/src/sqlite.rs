//! Durable session store on SQLite.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use tracing::{info, trace};

use crate::error::{Result, SessionError};
use crate::store::{Session, SessionStore, StoreBackend};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// How long a statement waits on a database locked by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Session store persisted in the `user_sessions` table.
///
/// Thread-safe via internal `Mutex<Connection>`; every statement runs alone
/// on the single connection, so per-row operations are atomic.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run pending migrations.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        // Must precede the WAL switch, which takes the write lock.
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let mut store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        info!(path = %path.display(), "Opened session database");
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let mut store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&mut self) -> Result<()> {
        let conn = self.conn.get_mut();
        embedded::migrations::runner()
            .run(conn)
            .map_err(|e| SessionError::Migration(e.to_string()))?;
        Ok(())
    }
}

impl SessionStore for SqliteStore {
    fn put(&self, session_id: &str, user_id: &str, created_at: DateTime<Utc>) -> Result<()> {
        let inserted = self.conn.lock().execute(
            "INSERT INTO user_sessions (session_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![session_id, user_id, format_dt(created_at)],
        );

        match inserted {
            Ok(_) => {
                trace!(session_id = %session_id, "Session row inserted");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(SessionError::DuplicateId(session_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, session_id: &str) -> Result<Option<Session>> {
        let row = self
            .conn
            .lock()
            .query_row(
                "SELECT session_id, user_id, created_at FROM user_sessions WHERE session_id = ?1",
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(row_to_session).transpose()
    }

    fn delete(&self, session_id: &str) -> Result<bool> {
        let removed = self.conn.lock().execute(
            "DELETE FROM user_sessions WHERE session_id = ?1",
            params![session_id],
        )?;
        Ok(removed > 0)
    }

    fn scan(&self) -> Result<Vec<Session>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT session_id, user_id, created_at FROM user_sessions")?;
        let iter = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for r in iter {
            sessions.push(row_to_session(r?)?);
        }
        Ok(sessions)
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM user_sessions", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Sqlite
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn format_dt(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_session((session_id, user_id, created_at): (String, String, String)) -> Result<Session> {
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SessionError::Corrupt {
            session_id: session_id.clone(),
            reason: format!("bad created_at '{created_at}': {e}"),
        })?;

    Ok(Session {
        session_id,
        user_id,
        created_at,
    })
}
