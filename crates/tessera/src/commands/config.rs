//! Config command - configuration management.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use serde::Serialize;

use tessera_config::{AuthType, TesseraConfig};
use tessera_session::{DEFAULT_COOKIE_NAME, StoreBackend};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved session settings and where they came from
    Show,

    /// Show configuration file path
    Path,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./tessera.toml) instead of user config
        #[arg(long)]
        local: bool,
    },
}

/// Resolved settings for JSON output.
#[derive(Debug, Serialize)]
struct ShowOutput {
    auth_type: String,
    backend: StoreBackend,
    duration_secs: u64,
    cookie_name: String,
    database_path: PathBuf,
    loaded_from: Vec<PathBuf>,
    warnings: Vec<String>,
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local } => cmd_init(ctx, local),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = ctx.load_config()?;
    let resolved = loaded.resolve_session();

    if ctx.json_output {
        let output = ShowOutput {
            auth_type: resolved.auth_type.to_string(),
            backend: resolved.backend(),
            duration_secs: resolved.duration.as_secs(),
            cookie_name: resolved.cookie_name.clone(),
            database_path: resolved.database_path.clone(),
            loaded_from: loaded
                .loaded_from()
                .into_iter()
                .map(|p| p.to_path_buf())
                .collect(),
            warnings: loaded.warnings.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("# Tessera Configuration\n");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Session:");
    println!("  auth type: {}", resolved.auth_type);
    println!("  backend:   {}", resolved.backend());
    println!("  duration:  {}", resolved.duration);
    println!("  cookie:    {}", resolved.cookie_name);
    println!("  database:  {}", resolved.database_path.display());
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = loaded.config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let dir = user_config_dir(ctx)?;
    println!("{}", dir.join("config.toml").display());
    Ok(())
}

fn cmd_init(ctx: &Context, local: bool) -> Result<()> {
    let path = if local {
        PathBuf::from("tessera.toml")
    } else {
        user_config_dir(ctx)?.join("config.toml")
    };

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    let mut config = TesseraConfig::new();
    config.session.auth_type = Some(AuthType::default().to_string());
    config.session.duration_secs = Some(0);
    config.session.cookie_name = Some(DEFAULT_COOKIE_NAME.to_string());

    tessera_config::save_config(&config, &path)?;
    println!("✓ Created config file: {}", path.display());
    Ok(())
}

fn user_config_dir(ctx: &Context) -> Result<PathBuf> {
    ctx.config_dir
        .clone()
        .or_else(tessera_config::xdg_config_dir)
        .ok_or_else(|| anyhow!("Could not determine config directory"))
}
