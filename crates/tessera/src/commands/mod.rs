//! CLI command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use tessera_config::{LoadedConfig, ResolvedSession};
use tessera_session::{MemoryStore, SessionAuthenticator, SessionStore, SqliteStore, StoreBackend};

pub mod config;
pub mod create;
pub mod destroy;
pub mod reap;
pub mod resolve;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Explicit config directory (overrides discovery).
    pub config_dir: Option<PathBuf>,
}

impl Context {
    /// Load layered config files plus environment overrides.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = tessera_config::load_config_with_options(None, self.config_dir.as_deref())
            .context("failed to load configuration")?;
        for warning in &loaded.warnings {
            warn!("{warning}");
        }
        Ok(loaded)
    }

    /// Build the authenticator over the configured store.
    pub fn authenticator(&self) -> Result<SessionAuthenticator> {
        let resolved = self.load_config()?.resolve_session();
        let store = open_store(&resolved)?;
        debug!(
            auth_type = %resolved.auth_type,
            backend = %store.backend(),
            duration = %resolved.duration,
            "Session authenticator ready"
        );
        Ok(SessionAuthenticator::new(
            store,
            resolved.authenticator_config(),
        ))
    }
}

/// Construct the store selected by `resolved`.
pub fn open_store(resolved: &ResolvedSession) -> Result<Arc<dyn SessionStore>> {
    match resolved.backend() {
        StoreBackend::Memory => {
            warn!("Using the in-memory session store; sessions end with this process");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(&resolved.database_path).with_context(|| {
                format!(
                    "failed to open session database {}",
                    resolved.database_path.display()
                )
            })?;
            Ok(Arc::new(store))
        }
    }
}
