//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use drishti_store::{BASE_URL_ENV, SettingsStore, default_config_dir, default_settings_path};
use tracing::info;

use super::emit;
use crate::Cli;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the backend base URL.
    SetBaseUrl {
        /// Absolute http(s) URL.
        url: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::SetBaseUrl { url } => set_base_url(url, cli).await,
        ConfigAction::Reset => reset_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    let settings = store.get().await;
    let env = std::env::var(BASE_URL_ENV).ok();
    let effective = settings
        .resolve_base_url(cli.api_base.as_deref(), env.as_deref())
        .ok();

    emit(cli, &settings, || {
        let mut lines = vec![
            "Drishti Configuration".to_string(),
            "─".repeat(40),
            String::new(),
            format!(
                "API base URL:    {}",
                settings.api_base_url.as_deref().unwrap_or("(not set)")
            ),
        ];
        if let Some(url) = effective.as_deref() {
            if settings.api_base_url.as_deref() != Some(url) {
                lines.push(format!("  overridden by:  {url}"));
            }
        }
        lines.push(format!(
            "Request timeout: {}",
            settings
                .request_timeout()
                .map_or_else(|| "default".to_string(), |t| format!("{}s", t.as_secs()))
        ));
        lines.push(format!("Use keychain:    {}", settings.use_keychain));
        lines.push(format!("Page size:       {}", settings.default_page_size));
        lines.push(format!("Trend window:    {}", settings.default_trend_window));
        lines.join("\n")
    })
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();

    let paths = serde_json::json!({
        "config_dir": config_dir.display().to_string(),
        "settings_file": settings_path.display().to_string(),
    });
    emit(cli, &paths, || {
        [
            "Configuration Paths".to_string(),
            "─".repeat(40),
            String::new(),
            format!("Config dir:    {}", config_dir.display()),
            format!("Settings file: {}", settings_path.display()),
        ]
        .join("\n")
    })
}

async fn set_base_url(url: &str, cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    store.set_api_base_url(url).await?;
    store.save().await?;

    let saved = store.api_base_url().await.unwrap_or_default();
    info!(url = %saved, "Base URL updated");
    emit(cli, &serde_json::json!({ "api_base_url": saved }), || {
        format!("API base URL set to: {saved}")
    })
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await;
    let existed = store.path().exists();
    store.reset().await;
    if existed {
        store.save().await?;
        info!(path = %store.path().display(), "Settings reset");
    }

    emit(cli, &serde_json::json!({ "reset": existed }), || {
        if existed {
            "Configuration reset to defaults".to_string()
        } else {
            "No configuration file to reset".to_string()
        }
    })
}
