//! Opaque session identifiers bound to users, with lazy expiration.
//!
//! This crate provides:
//! - Random, unguessable session ids
//! - Interchangeable storage backends (in-memory and SQLite)
//! - A pure expiration policy evaluated on every lookup
//! - An authenticator that creates, resolves and destroys sessions
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tessera_session::{AuthenticatorConfig, MemoryStore, SessionAuthenticator, SessionDuration};
//!
//! let config = AuthenticatorConfig::new().with_duration(SessionDuration::from_secs(3600));
//! let auth = SessionAuthenticator::new(Arc::new(MemoryStore::new()), config);
//!
//! let id = auth.create_session(Some("user-1")).unwrap().unwrap();
//! assert_eq!(auth.resolve(Some(&id)).unwrap().as_deref(), Some("user-1"));
//! ```

mod authenticator;
mod config;
mod error;
mod expiry;
mod id;
mod memory;
mod request;
mod sqlite;
mod store;

pub use authenticator::SessionAuthenticator;
pub use config::{AuthenticatorConfig, DEFAULT_COOKIE_NAME};
pub use error::{Result, SessionError};
pub use expiry::{SessionDuration, expires_at, is_expired};
pub use id::{IdGenerator, UuidGenerator};
pub use memory::MemoryStore;
pub use request::SessionRequest;
pub use sqlite::SqliteStore;
pub use store::{Session, SessionStore, StoreBackend};
