//! Reap command - bulk removal of expired sessions.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the reap command.
#[derive(Args, Debug)]
pub struct ReapArgs {}

#[derive(Debug, Serialize)]
struct ReapOutput {
    removed: usize,
    remaining: usize,
}

/// Run the reap command.
pub fn run(_args: ReapArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.authenticator()?;
    let removed = auth.reap_expired()?;
    let remaining = auth.store().len()?;

    if ctx.json_output {
        let output = ReapOutput { removed, remaining };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{removed}");
    }
    Ok(())
}
