//! Error types for session store and authenticator operations.
//!
//! Invalid input and unknown or expired sessions are not errors: the
//! authenticator reports them as absent results. Everything here means the
//! outcome of an operation is unknown and must reach the caller.

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Backing database failed (unreachable, locked, I/O).
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema migrations could not be applied.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A record with this id already exists.
    ///
    /// Ids are minted fresh for every insert, so this signals a broken
    /// generator or a store shared with a foreign writer.
    #[error("Session id already stored: {0}")]
    DuplicateId(String),

    /// A stored record could not be decoded.
    #[error("Corrupt session record {session_id}: {reason}")]
    Corrupt { session_id: String, reason: String },
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
