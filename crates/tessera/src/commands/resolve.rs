//! Resolve command - looks up the user behind a session id.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use console::Style;
use serde::Serialize;

use tessera_session::Session;

use super::Context;

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Session id to look up
    pub session_id: String,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    #[serde(flatten)]
    session: Session,
    expires_at: Option<DateTime<Utc>>,
}

/// Run the resolve command.
pub fn run(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.authenticator()?;

    let Some(session) = auth.session_at(Some(&args.session_id), Utc::now())? else {
        bail!("no live session for that id");
    };
    let expires_at = auth.duration().expires_at(session.created_at);

    if ctx.json_output {
        let output = ResolveOutput {
            session,
            expires_at,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if ctx.verbose {
        let dim = Style::new().dim();
        println!("{}", session.user_id);
        eprintln!("  {} {}", dim.apply_to("Created:"), session.created_at.to_rfc3339());
        match expires_at {
            Some(at) => eprintln!("  {} {}", dim.apply_to("Expires:"), at.to_rfc3339()),
            None => eprintln!("  {} never", dim.apply_to("Expires:")),
        }
    } else {
        println!("{}", session.user_id);
    }
    Ok(())
}
