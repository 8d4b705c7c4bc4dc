//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `~/.config/tessera/config.toml` (XDG user config)
//! 2. `./tessera.toml` (project-local)
//! 3. Environment variables (`SESSION_DURATION`, `AUTH_TYPE`, ...)

use std::path::{Path, PathBuf};

use crate::env::apply_env_overrides;
use crate::{ConfigError, ResolvedSession, Result, TesseraConfig};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "tessera.toml";

/// Default config filename within XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Default SQLite filename within the config directory.
const DATABASE_FILE: &str = "sessions.db";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "tessera";

/// Environment variable to override the config directory.
///
/// When set, this takes precedence over the platform default.
/// Useful for testing and running multiple instances with different configs.
const CONFIG_DIR_ENV: &str = "TESSERA_CONFIG_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: TesseraConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Directory holding user config and, by default, the database.
    pub config_dir: Option<PathBuf>,
    /// Warnings generated during loading (e.g., unreadable files).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }

    /// Database location used when none is configured.
    pub fn default_database_path(&self) -> PathBuf {
        match &self.config_dir {
            Some(dir) => dir.join(DATABASE_FILE),
            None => PathBuf::from(DATABASE_FILE),
        }
    }

    /// Resolve the session settings against this load's defaults.
    pub fn resolve_session(&self) -> ResolvedSession {
        self.config.session.resolve(&self.default_database_path())
    }
}

/// Load configuration by discovering and merging all config layers,
/// then applying environment overrides.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Load configuration with explicit control over the user config directory.
///
/// `config_dir` overrides both `TESSERA_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let mut loaded = load_files(project_dir, config_dir)?;
    apply_env_overrides(&mut loaded.config);
    check_auth_type(&loaded.config, &mut loaded.warnings);
    Ok(loaded)
}

/// Discover and merge config files only (no environment overrides).
pub fn load_files(project_dir: Option<&Path>, config_dir: Option<&Path>) -> Result<LoadedConfig> {
    let mut config = TesseraConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config: explicit override, then env var, then platform default
    let config_dir = match config_dir {
        Some(dir) => Some(dir.to_path_buf()),
        None => xdg_config_dir(),
    };
    if let Some(dir) = &config_dir {
        let source = load_layer(&mut config, &dir.join(USER_CONFIG_FILE), &mut warnings)?;
        sources.push(source);
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    let source = load_layer(&mut config, &project_path, &mut warnings)?;
    sources.push(source);

    Ok(LoadedConfig {
        config,
        sources,
        config_dir,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<TesseraConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    TesseraConfig::from_toml(&contents)
}

/// Save configuration to a file.
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &TesseraConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Get the XDG config file path for tessera.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the XDG config directory for tessera.
///
/// Checks `TESSERA_CONFIG_DIR` env var first, then falls back to platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Try to load a config file and merge it into the existing config.
fn load_layer(
    config: &mut TesseraConfig,
    path: &Path,
    warnings: &mut Vec<String>,
) -> Result<ConfigSource> {
    if !path.is_file() {
        return Ok(ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        });
    }

    match load_config_file(path) {
        Ok(layer) => {
            config.merge(layer);
            Ok(ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            })
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            Ok(ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            })
        }
    }
}

/// Warn when the backend selector names nothing we know.
fn check_auth_type(config: &TesseraConfig, warnings: &mut Vec<String>) {
    if let Some(name) = config.session.auth_type.as_deref()
        && crate::AuthType::from_name(name).is_none()
    {
        warnings.push(format!(
            "Unrecognized auth type '{}', falling back to {}",
            name,
            crate::AuthType::default()
        ));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::AuthType;

    #[test]
    fn test_xdg_config_path_shape() {
        if let Some(p) = xdg_config_path() {
            assert!(p.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[session]
auth_type = "session_exp_auth"
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.session.auth_type(), AuthType::SessionExp);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_files_none_present() {
        let project = TempDir::new().unwrap();
        let config_dir = TempDir::new().unwrap();

        let loaded = load_files(Some(project.path()), Some(config_dir.path())).unwrap();
        assert_eq!(loaded.config, TesseraConfig::new());
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(
            loaded.default_database_path(),
            config_dir.path().join("sessions.db")
        );
    }

    #[test]
    fn test_load_files_layered_merge() {
        let config_dir = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        fs::write(
            config_dir.path().join("config.toml"),
            r#"
[session]
auth_type = "session_db_auth"
duration_secs = 3600
"#,
        )
        .unwrap();
        fs::write(
            project.path().join("tessera.toml"),
            r#"
[session]
duration_secs = 60
"#,
        )
        .unwrap();

        let loaded = load_files(Some(project.path()), Some(config_dir.path())).unwrap();
        assert_eq!(loaded.loaded_from().len(), 2);

        let resolved = loaded.resolve_session();
        assert_eq!(resolved.auth_type, AuthType::SessionDb);
        assert_eq!(resolved.duration.as_secs(), 60);
        assert_eq!(resolved.database_path, config_dir.path().join("sessions.db"));
    }

    #[test]
    fn test_malformed_layer_warns_but_continues() {
        let config_dir = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("tessera.toml"), "not valid toml {{{{").unwrap();

        let loaded = load_files(Some(project.path()), Some(config_dir.path())).unwrap();
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("Failed to load"));
    }

    #[test]
    fn test_unknown_auth_type_warns() {
        let mut config = TesseraConfig::new();
        config.session.auth_type = Some("basic_auth".into());

        let mut warnings = Vec::new();
        check_auth_type(&config, &mut warnings);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("basic_auth"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = TesseraConfig::new();
        config.session.auth_type = Some("session_exp_auth".into());
        config.session.duration_secs = Some(120);

        save_config(&config, &path).unwrap();
        assert_eq!(load_config_file(&path).unwrap(), config);
    }
}
