//! Account command.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use super::auth::read_secret;
use super::emit;
use crate::Cli;
use crate::context::Context;

/// Arguments for the account command.
#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub action: AccountAction,
}

/// Account subcommands.
#[derive(Subcommand)]
pub enum AccountAction {
    /// Permanently delete the account and sign out.
    Delete {
        /// Current password. Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
}

/// Runs the account command.
pub async fn run(args: &AccountArgs, ctx: &Context, cli: &Cli) -> Result<()> {
    ctx.require_signed_in()?;

    match &args.action {
        AccountAction::Delete { password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => read_secret("Password to confirm deletion").await?,
            };
            ctx.auth.delete_account(&password).await?;
            emit(cli, &json!({ "deleted": true }), || {
                "Account deleted. You have been signed out".to_string()
            })
        }
    }
}
