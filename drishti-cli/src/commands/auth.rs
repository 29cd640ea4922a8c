//! Login, logout, register, and status commands.

use anyhow::{Context as _, Result};
use clap::Args;
use drishti_core::Registration;
use drishti_store::SignOutReason;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::emit;
use crate::Cli;
use crate::context::Context;
use crate::output::{StatusOutput, TextFormatter};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long, short)]
    pub email: String,

    /// Password. Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Display name.
    #[arg(long, short)]
    pub name: String,

    /// Account email.
    #[arg(long, short)]
    pub email: String,

    /// Password. Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,

    /// Password again. Read from stdin when omitted.
    #[arg(long)]
    pub confirm_password: Option<String>,
}

/// Reads one line from stdin after printing `prompt` to stderr.
pub(crate) async fn read_secret(prompt: &str) -> Result<String> {
    eprint!("{prompt}: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn secret_or_prompt(value: Option<&String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => read_secret(prompt).await,
    }
}

/// Runs the login command.
pub async fn login(args: &LoginArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    let password = secret_or_prompt(args.password.as_ref(), "Password").await?;
    ctx.auth.sign_in(&args.email, &password).await?;

    info!(backend = ctx.backend.as_str(), "Token stored");
    emit(cli, &json!({ "signedIn": true, "email": args.email.trim() }), || {
        format!("Signed in as {}", args.email.trim())
    })
}

/// Runs the logout command.
pub async fn logout(ctx: &Context, cli: &Cli) -> Result<()> {
    let was_signed_in = ctx.auth.state().is_signed_in();
    ctx.auth.sign_out(SignOutReason::Manual).await?;

    emit(cli, &json!({ "signedIn": false }), || {
        if was_signed_in {
            "Signed out".to_string()
        } else {
            "Already signed out".to_string()
        }
    })
}

/// Runs the register command.
pub async fn register(args: &RegisterArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    let password = secret_or_prompt(args.password.as_ref(), "Password").await?;
    let confirm_password =
        secret_or_prompt(args.confirm_password.as_ref(), "Confirm password").await?;

    let form = Registration {
        name: args.name.clone(),
        email: args.email.clone(),
        password,
        confirm_password,
    };
    let created = ctx.auth.register(&form).await?;

    emit(cli, &created, || {
        format!(
            "Account created for {}. Run `drishti login --email {}` to sign in",
            form.name.trim(),
            form.email.trim()
        )
    })
}

/// Runs the status command. Does not contact the backend.
pub fn status(ctx: &Context, cli: &Cli) -> Result<()> {
    let output = StatusOutput {
        base_url: ctx.base_url().to_string(),
        token_store: ctx.backend.as_str().to_string(),
        signed_in: ctx.auth.state().is_signed_in(),
    };
    emit(cli, &output, || {
        TextFormatter::new(!cli.no_color).format_status(
            &output.base_url,
            &output.token_store,
            output.signed_in,
        )
    })
}
