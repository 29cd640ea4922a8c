//! Per-invocation backend context.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use drishti_api::{ApiError, DrishtiApi, PublishError};
use drishti_fetch::{ApiClient, KeychainTokenStore, MemoryTokenStore, RequestError, TokenStore};
use drishti_store::{
    AuthListenerGuard, AuthNotice, AuthState, AuthStore, BASE_URL_ENV, Settings, SettingsStore,
    StoreError,
};
use tokio::sync::broadcast;
use tracing::debug;

use crate::Cli;

/// How long to wait for the sign-out a 401 triggers.
const NOTICE_GRACE: Duration = Duration::from_secs(2);

/// Where the session token lives for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBackend {
    /// System keychain.
    Keychain,
    /// Process memory; lost on exit.
    Memory,
}

impl TokenBackend {
    /// Picks the backend from flags and settings.
    pub fn select(ephemeral: bool, settings: &Settings) -> Self {
        if ephemeral || !settings.use_keychain {
            TokenBackend::Memory
        } else {
            TokenBackend::Keychain
        }
    }

    /// Short name for status output.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenBackend::Keychain => "keychain",
            TokenBackend::Memory => "memory",
        }
    }

    fn store(self) -> Arc<dyn TokenStore> {
        match self {
            TokenBackend::Keychain => Arc::new(KeychainTokenStore::system()),
            TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
        }
    }
}

/// Client, endpoints, and auth state wired together.
pub struct Context {
    /// Endpoint groups.
    pub api: DrishtiApi,
    /// Auth state machine attached to the client.
    pub auth: AuthStore,
    /// Settings as loaded for this run.
    pub settings: Settings,
    /// Where the token is kept.
    pub backend: TokenBackend,
    base_url: String,
    notices: broadcast::Receiver<AuthNotice>,
    signed_in_at_start: bool,
    _listener: AuthListenerGuard,
}

impl Context {
    /// Loads settings, builds the client, and initializes auth.
    pub async fn connect(cli: &Cli) -> Result<Self> {
        let settings = SettingsStore::load_default().await.get().await;
        let env = std::env::var(BASE_URL_ENV).ok();
        let base_url = settings.resolve_base_url(cli.api_base.as_deref(), env.as_deref())?;

        let backend = TokenBackend::select(cli.ephemeral, &settings);
        let mut builder = ApiClient::builder(base_url.clone()).token_store(backend.store());
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .with_context(|| format!("Cannot use API base URL {base_url}"))?;

        let auth = AuthStore::new(&client);
        let listener = auth.attach(&client);
        let notices = auth.notices();
        let state = auth.initialize().await;
        debug!(base_url = %base_url, backend = backend.as_str(), state = %state, "Context ready");

        Ok(Self {
            api: DrishtiApi::new(&client),
            auth,
            settings,
            backend,
            base_url,
            notices,
            signed_in_at_start: state == AuthState::SignedIn,
            _listener: listener,
        })
    }

    /// Resolved backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fails early when no session token is stored.
    pub fn require_signed_in(&self) -> Result<()> {
        if self.auth.state().is_signed_in() {
            Ok(())
        } else {
            anyhow::bail!("Not signed in. Run `drishti login` first")
        }
    }

    /// Waits for the expired-session notice that follows a 401.
    ///
    /// Returns `None` straight away unless a session was active.
    pub async fn expired_notice(&mut self) -> Option<AuthNotice> {
        if let Ok(notice) = self.notices.try_recv() {
            return Some(notice);
        }
        if !self.signed_in_at_start {
            return None;
        }
        tokio::time::timeout(NOTICE_GRACE, self.notices.recv())
            .await
            .ok()?
            .ok()
    }
}

// ============================================================================
// Error classification
// ============================================================================

/// True when any error in the chain is a 401 from the backend.
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            e.is_unauthorized()
        } else if let Some(e) = cause.downcast_ref::<ApiError>() {
            e.is_unauthorized()
        } else if let Some(PublishError::Api(e)) = cause.downcast_ref::<PublishError>() {
            e.is_unauthorized()
        } else if let Some(e) = cause.downcast_ref::<RequestError>() {
            e.is_unauthorized()
        } else {
            false
        }
    })
}

/// True when the input was rejected before anything was sent.
pub fn is_invalid_input(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<StoreError>(),
            Some(StoreError::Validation(_))
        ) || matches!(
            cause.downcast_ref::<ApiError>(),
            Some(ApiError::Validation(_))
        ) || cause.is::<drishti_core::ValidationError>()
    })
}
