//! Tessera - session identifier service
//!
//! Main entry point for the Tessera CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{config, create, destroy, reap, resolve};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Tessera - issue, resolve and destroy opaque session identifiers
#[derive(Parser)]
#[command(name = "tessera")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding config.toml and the default session database
    #[arg(long, global = true, env = "TESSERA_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a session for a user and print its id
    Create(create::CreateArgs),

    /// Print the user a session id belongs to
    Resolve(resolve::ResolveArgs),

    /// Destroy a live session
    Destroy(destroy::DestroyArgs),

    /// Remove every expired session from the store
    Reap(reap::ReapArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: stderr console layer plus rotating JSON file
    let filter = if cli.verbose {
        "tessera=debug,tessera_session=debug,tessera_config=debug,info"
    } else {
        "tessera=info,tessera_session=warn,warn"
    };

    let log_dir = cli
        .config_dir
        .clone()
        .or_else(tessera_config::xdg_config_dir)
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "tessera.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "tessera=trace,tessera_session=trace,tessera_config=trace,info",
                )),
        )
        .init();

    // Create context for commands
    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config_dir: cli.config_dir,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Create(args) => create::run(args, &ctx),
        Commands::Resolve(args) => resolve::run(args, &ctx),
        Commands::Destroy(args) => destroy::run(args, &ctx),
        Commands::Reap(args) => reap::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
