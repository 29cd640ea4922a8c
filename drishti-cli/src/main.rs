// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Drishti CLI - yoga practice tracking from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Point the client at a backend
//! drishti config set-base-url https://api.example.com
//!
//! # Sign in
//! drishti login --email ana@example.com
//!
//! # Recent sessions as JSON
//! drishti sessions list --format json --pretty
//!
//! # Trend for one pose over 90 days, right side only
//! drishti trend marichyasana-a --metric ease --window 90 --side right
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{account, auth, card, config, poses, sessions, trend};
use context::Context;

// ============================================================================
// CLI Definition
// ============================================================================

/// Drishti CLI - yoga practice tracking.
#[derive(Parser)]
#[command(name = "drishti")]
#[command(about = "Yoga practice tracking CLI")]
#[command(long_about = r#"
Drishti records practice sessions, per-pose score cards, and trends.

Examples:
  drishti login --email ana@example.com
  drishti sessions list
  drishti sessions create-preset full-primary --duration 90
  drishti card update <card-id> --set ease=7 --notes "felt open"
  drishti trend <pose> --metric overall --window all
"#)]
#[command(version)]
#[command(author = "Drishti Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Backend base URL (overrides DRISHTI_API_BASE and settings).
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Keep the session token in memory only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token.
    Login(auth::LoginArgs),

    /// Sign out and remove the stored token.
    Logout,

    /// Create an account.
    Register(auth::RegisterArgs),

    /// Show backend and sign-in state.
    Status,

    /// Practice sessions.
    #[command(visible_alias = "s")]
    Sessions(sessions::SessionsArgs),

    /// Score cards.
    #[command(visible_alias = "c")]
    Card(card::CardArgs),

    /// Browse the pose catalog.
    #[command(visible_alias = "p")]
    Poses(poses::PosesArgs),

    /// Chart a metric for one pose.
    #[command(visible_alias = "t")]
    Trend(trend::TrendArgs),

    /// Account management.
    Account(account::AccountArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

impl Commands {
    /// A 401 from these means rejected credentials, not an expired session.
    fn exchanges_credentials(&self) -> bool {
        matches!(self, Commands::Login(_) | Commands::Register(_))
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The backend rejected the session.
    Unauthorized = 2,
    /// Input rejected before sending.
    InvalidInput = 3,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("drishti=debug,info")
    } else {
        EnvFilter::new("drishti=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Config(args) => config::run(args, &cli).await,
        command => run_connected(command, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        let code = if context::is_unauthorized(&e) && !cli.command.exchanges_credentials() {
            ExitCode::Unauthorized
        } else if context::is_invalid_input(&e) {
            ExitCode::InvalidInput
        } else {
            ExitCode::Error
        };
        std::process::exit(code as i32);
    }

    Ok(())
}

/// Runs a command that talks to the backend.
///
/// A 401 from any request signs the user out; the notice is printed once.
async fn run_connected(command: &Commands, cli: &Cli) -> Result<()> {
    let mut ctx = Context::connect(cli).await?;

    let result = match command {
        Commands::Login(args) => auth::login(args, &ctx, cli).await,
        Commands::Logout => auth::logout(&ctx, cli).await,
        Commands::Register(args) => auth::register(args, &ctx, cli).await,
        Commands::Status => auth::status(&ctx, cli),
        Commands::Sessions(args) => sessions::run(args, &ctx, cli).await,
        Commands::Card(args) => card::run(args, &ctx, cli).await,
        Commands::Poses(args) => poses::run(args, &ctx, cli).await,
        Commands::Trend(args) => trend::run(args, &ctx, cli).await,
        Commands::Account(args) => account::run(args, &ctx, cli).await,
        Commands::Config(args) => config::run(args, cli).await,
    };

    if let Err(e) = &result {
        if context::is_unauthorized(e) && !command.exchanges_credentials() {
            if let Some(notice) = ctx.expired_notice().await {
                if !cli.quiet {
                    eprintln!("{}", notice.message());
                }
                std::process::exit(ExitCode::Unauthorized as i32);
            }
        }
    }

    result
}
