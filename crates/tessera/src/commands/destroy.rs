//! Destroy command - logs a session out.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the destroy command.
#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Session id to destroy
    pub session_id: String,
}

#[derive(Debug, Serialize)]
struct DestroyOutput<'a> {
    session_id: &'a str,
    destroyed: bool,
}

/// Run the destroy command.
pub fn run(args: DestroyArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.authenticator()?;
    let destroyed = auth.destroy_session(Some(&args.session_id))?;

    if ctx.json_output {
        let output = DestroyOutput {
            session_id: &args.session_id,
            destroyed,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if !destroyed {
        bail!("no live session for that id");
    }
    if !ctx.json_output {
        println!("destroyed");
    }
    Ok(())
}
