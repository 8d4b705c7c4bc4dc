//! Create command - issues a new session for a user.

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use super::Context;

/// Arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// User the session belongs to
    pub user_id: String,
}

#[derive(Debug, Serialize)]
struct CreateOutput<'a> {
    session_id: &'a str,
    user_id: &'a str,
}

/// Run the create command.
pub fn run(args: CreateArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.authenticator()?;

    let Some(session_id) = auth.create_session(Some(&args.user_id))? else {
        bail!("user id must not be empty");
    };

    if ctx.json_output {
        let output = CreateOutput {
            session_id: &session_id,
            user_id: &args.user_id,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{session_id}");
    }
    Ok(())
}
