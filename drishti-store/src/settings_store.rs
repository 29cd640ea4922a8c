//! User preferences store.
//!
//! Settings live in one JSON file and are read once per process.

use drishti_core::TrendWindow;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "DRISHTI_API_BASE";

// ============================================================================
// Settings Types
// ============================================================================

/// Client preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub api_base_url: Option<String>,

    /// Transport timeout in seconds; `None` leaves the HTTP default.
    pub request_timeout_secs: Option<u64>,

    /// Keep the session token in the system keychain.
    pub use_keychain: bool,

    /// Sessions fetched per page.
    pub default_page_size: u32,

    /// Window used by `trend` when none is given.
    pub default_trend_window: TrendWindow,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_secs: None,
            use_keychain: true,
            default_page_size: 20,
            default_trend_window: TrendWindow::default(),
        }
    }
}

impl Settings {
    /// Configured transport timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }

    /// Resolves the base URL: explicit flag, then environment, then settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when no source provides a URL or the
    /// chosen one is not absolute.
    pub fn resolve_base_url(
        &self,
        flag: Option<&str>,
        env: Option<&str>,
    ) -> Result<String, StoreError> {
        let candidate = [flag, env, self.api_base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .ok_or_else(|| {
                StoreError::Config(format!(
                    "No API base URL configured. Pass --api-base, set {BASE_URL_ENV}, \
                     or run `drishti config set-base-url <url>`"
                ))
            })?;
        validate_base_url(candidate)
    }
}

/// Checks that `raw` is an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`StoreError::Config`] describing the problem.
pub fn validate_base_url(raw: &str) -> Result<String, StoreError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| StoreError::Config(format!("Invalid API base URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StoreError::Config(format!(
            "API base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(raw.trim().to_string())
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings backed by `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path. Missing or corrupt files yield defaults.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `f` to the in-memory settings. Does not save.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Configured base URL.
    pub async fn api_base_url(&self) -> Option<String> {
        self.settings.read().await.api_base_url.clone()
    }

    /// Validates and stores a base URL. Does not save.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL is not absolute http(s).
    pub async fn set_api_base_url(&self, url: &str) -> Result<(), StoreError> {
        let url = validate_base_url(url)?;
        self.update(|s| s.api_base_url = Some(url)).await;
        Ok(())
    }

    /// Restores every setting to its default. Does not save.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.use_keychain);
        assert_eq!(settings.default_page_size, 20);
        assert_eq!(settings.default_trend_window, TrendWindow::Days(30));
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "api_base_url": "https://api.example.com" }"#).unwrap();
        assert_eq!(settings.api_base_url.as_deref(), Some("https://api.example.com"));
        assert!(settings.use_keychain);
        assert_eq!(settings.default_page_size, 20);
    }

    #[test]
    fn test_base_url_precedence() {
        let settings = Settings {
            api_base_url: Some("https://from-file.example.com".to_string()),
            ..Settings::default()
        };

        let url = settings
            .resolve_base_url(Some("https://flag.example.com"), Some("https://env.example.com"))
            .unwrap();
        assert_eq!(url, "https://flag.example.com");

        let url = settings
            .resolve_base_url(None, Some("https://env.example.com"))
            .unwrap();
        assert_eq!(url, "https://env.example.com");

        let url = settings.resolve_base_url(Some("  "), None).unwrap();
        assert_eq!(url, "https://from-file.example.com");
    }

    #[test]
    fn test_base_url_missing_or_invalid() {
        let settings = Settings::default();
        assert!(matches!(
            settings.resolve_base_url(None, None),
            Err(StoreError::Config(_))
        ));
        assert!(settings.resolve_base_url(Some("ftp://x.example.com"), None).is_err());
        assert!(settings.resolve_base_url(Some("not a url"), None).is_err());
    }

    #[tokio::test]
    async fn test_update_persists_on_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(path.clone()).await;
        store.set_api_base_url("https://api.example.com/").await.unwrap();
        store.update(|s| s.default_page_size = 50).await;
        assert!(!path.exists());

        store.save().await.unwrap();

        let reloaded = SettingsStore::load(path).await;
        let settings = reloaded.get().await;
        assert_eq!(settings.api_base_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(settings.default_page_size, 50);
    }

    #[tokio::test]
    async fn test_invalid_url_not_stored() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        assert!(store.set_api_base_url("nope").await.is_err());
        assert_eq!(store.api_base_url().await, None);
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        store.update(|s| s.use_keychain = false).await;
        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "[1, 2").await.unwrap();

        let store = SettingsStore::load(path).await;
        assert_eq!(store.get().await, Settings::default());
    }
}
