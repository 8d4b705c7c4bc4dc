//! Configuration system for the Tessera session service.
//!
//! Provides TOML-based configuration with:
//! - A `[session]` section selecting backend, lifetime and cookie name
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment overrides (`SESSION_DURATION`, `AUTH_TYPE`, `SESSION_NAME`,
//!   `TESSERA_DATABASE`) applied last

pub mod discovery;
pub mod env;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    load_files, save_config, xdg_config_dir, xdg_config_path,
};
pub use env::{apply_env_overrides, apply_overrides_from};
pub use error::{ConfigError, Result};
pub use types::*;
