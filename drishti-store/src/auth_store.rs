//! Session/auth state.
//!
//! The store owns the `Loading → SignedOut | SignedIn` state machine, keeps
//! the token store in step with it, and turns 401 notifications from the
//! [`ApiClient`] into an expired sign-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use drishti_api::{AccountApi, AuthApi};
use drishti_core::Registration;
use drishti_core::validation::require_password;
use drishti_fetch::{ApiClient, TokenStore, UnauthorizedNotifier};
use serde_json::Value;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

/// Capacity of the notice channel; slow receivers lose the oldest notices.
const NOTICE_CAPACITY: usize = 16;

// ============================================================================
// State Types
// ============================================================================

/// Authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Stored token not yet checked.
    Loading,
    /// No usable token.
    SignedOut,
    /// A token is stored.
    SignedIn,
}

impl AuthState {
    /// True while the initial token check is pending.
    pub fn is_loading(self) -> bool {
        self == AuthState::Loading
    }

    /// True when signed in.
    pub fn is_signed_in(self) -> bool {
        self == AuthState::SignedIn
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthState::Loading => write!(f, "loading"),
            AuthState::SignedOut => write!(f, "signed out"),
            AuthState::SignedIn => write!(f, "signed in"),
        }
    }
}

/// Why a sign-out happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// The user asked for it.
    Manual,
    /// The server rejected the token.
    Expired,
}

/// One-shot user-facing notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthNotice {
    /// A signed-in session was ended by a 401.
    SessionExpired,
}

impl AuthNotice {
    /// Text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            AuthNotice::SessionExpired => "Session expired. Please log in again.",
        }
    }
}

// ============================================================================
// Auth Store
// ============================================================================

struct Inner {
    auth: AuthApi,
    account: AccountApi,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    notices: broadcast::Sender<AuthNotice>,
    version: AtomicU64,
    signing_out: AtomicBool,
    init: Mutex<()>,
}

/// Shared auth state machine. Clones share state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &self.state())
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Creates a store in [`AuthState::Loading`] using the client's token store.
    pub fn new(client: &ApiClient) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                auth: AuthApi::new(client.clone()),
                account: AccountApi::new(client.clone()),
                tokens: client.token_store(),
                state,
                notices,
                version: AtomicU64::new(0),
                signing_out: AtomicBool::new(false),
                init: Mutex::new(()),
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        *self.inner.state.borrow()
    }

    /// Number of state transitions so far.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Receiver for user-facing notices.
    pub fn notices(&self) -> broadcast::Receiver<AuthNotice> {
        self.inner.notices.subscribe()
    }

    /// Moves to `next`, notifying subscribers only on an actual change.
    fn transition(&self, next: AuthState) -> bool {
        let mut previous = next;
        let changed = self.inner.state.send_if_modified(|state| {
            previous = *state;
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
        if changed {
            let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;
            debug!(from = %previous, to = %next, version, "Auth state changed");
        }
        changed
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Reads the token store and leaves `Loading`. Later calls return the
    /// current state without touching storage.
    pub async fn initialize(&self) -> AuthState {
        let _guard = self.inner.init.lock().await;
        if !self.state().is_loading() {
            return self.state();
        }
        let next = if self.inner.tokens.has_token().await {
            AuthState::SignedIn
        } else {
            AuthState::SignedOut
        };
        self.transition(next);
        info!(state = %next, "Auth initialized");
        next
    }

    /// Logs in and stores the token. On failure the state is unchanged.
    ///
    /// # Errors
    ///
    /// Validation, transport, HTTP, or token storage failures.
    #[instrument(skip(self, secret))]
    pub async fn sign_in(&self, identity: &str, secret: &str) -> Result<(), StoreError> {
        let response = self.inner.auth.login(identity, secret).await?;
        self.inner.tokens.set_token(&response.token).await?;
        self.transition(AuthState::SignedIn);
        info!("Signed in");
        Ok(())
    }

    /// Clears the token and moves to `SignedOut`.
    ///
    /// Concurrent calls collapse into the one already running. A
    /// [`AuthNotice::SessionExpired`] is sent only for `Expired` sign-outs of
    /// a signed-in session.
    ///
    /// # Errors
    ///
    /// Returns the token store failure; the state still moves to `SignedOut`.
    #[instrument(skip(self))]
    pub async fn sign_out(&self, reason: SignOutReason) -> Result<(), StoreError> {
        if self
            .inner
            .signing_out
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sign-out already in progress");
            return Ok(());
        }

        let was_signed_in = self.state().is_signed_in();
        let cleared = self.inner.tokens.clear_token().await;
        self.transition(AuthState::SignedOut);
        self.inner.signing_out.store(false, Ordering::Release);

        if reason == SignOutReason::Expired && was_signed_in {
            warn!("Session expired");
            let _ = self.inner.notices.send(AuthNotice::SessionExpired);
        } else {
            info!(?reason, "Signed out");
        }

        cleared.map_err(StoreError::from)
    }

    /// Creates an account after local validation. Does not sign in.
    ///
    /// # Errors
    ///
    /// Validation or endpoint failures.
    #[instrument(skip(self, form), fields(email = %form.email.trim()))]
    pub async fn register(&self, form: &Registration) -> Result<Value, StoreError> {
        let (name, email) = form.validate()?;
        let created = self.inner.auth.signup(&name, &email, &form.password).await?;
        info!("Account registered");
        Ok(created)
    }

    /// Deletes the account, then signs out.
    ///
    /// # Errors
    ///
    /// A blank password is rejected locally; endpoint failures leave the
    /// session untouched.
    #[instrument(skip(self, password))]
    pub async fn delete_account(&self, password: &str) -> Result<(), StoreError> {
        require_password(password)?;
        self.inner.account.delete(password).await?;
        self.sign_out(SignOutReason::Manual).await
    }

    // ========================================================================
    // Unauthorized Listener
    // ========================================================================

    /// Registers as the client's unauthorized listener.
    ///
    /// Each 401 signs out with [`SignOutReason::Expired`] if currently signed
    /// in. Dropping the returned guard stops listening.
    pub fn attach(&self, client: &ApiClient) -> AuthListenerGuard {
        let mut listener = client.listen_unauthorized();
        let id = listener.id();
        let store = self.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = listener.recv().await {
                if !store.state().is_signed_in() {
                    debug!(path = %event.path, "401 while not signed in, ignoring");
                    continue;
                }
                if let Err(e) = store.sign_out(SignOutReason::Expired).await {
                    warn!(error = %e, "Failed to clear token after 401");
                }
            }
            debug!("Unauthorized listener closed");
        });

        AuthListenerGuard {
            task: Some(task),
            notifier: client.unauthorized().clone(),
            id,
        }
    }
}

/// Keeps an [`AuthStore`] attached to a client.
#[derive(Debug)]
pub struct AuthListenerGuard {
    task: Option<JoinHandle<()>>,
    notifier: UnauthorizedNotifier,
    id: u64,
}

impl AuthListenerGuard {
    /// Stops listening now.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for AuthListenerGuard {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.notifier.deregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drishti_fetch::MemoryTokenStore;

    fn store_with(tokens: Arc<MemoryTokenStore>) -> AuthStore {
        let client = ApiClient::builder("http://127.0.0.1:9")
            .token_store(tokens)
            .build()
            .unwrap();
        AuthStore::new(&client)
    }

    #[tokio::test]
    async fn test_initialize_without_token() {
        let store = store_with(Arc::new(MemoryTokenStore::new()));
        assert_eq!(store.state(), AuthState::Loading);
        assert_eq!(store.initialize().await, AuthState::SignedOut);
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_initialize_once() {
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let store = store_with(Arc::clone(&tokens));
        assert_eq!(store.initialize().await, AuthState::SignedIn);

        tokens.clear_token().await.unwrap();
        assert_eq!(store.initialize().await, AuthState::SignedIn);
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_manual_sign_out_has_no_notice() {
        let store = store_with(Arc::new(MemoryTokenStore::with_token("t")));
        store.initialize().await;
        let mut notices = store.notices();

        store.sign_out(SignOutReason::Manual).await.unwrap();
        assert_eq!(store.state(), AuthState::SignedOut);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_expired_notice_only_when_signed_in() {
        let store = store_with(Arc::new(MemoryTokenStore::new()));
        store.initialize().await;
        let mut notices = store.notices();

        store.sign_out(SignOutReason::Expired).await.unwrap();
        assert!(notices.try_recv().is_err());
        // Already signed out: no transition.
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_expired_sign_out_emits_notice() {
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let store = store_with(Arc::clone(&tokens));
        store.initialize().await;
        let mut notices = store.notices();
        let mut states = store.subscribe();

        store.sign_out(SignOutReason::Expired).await.unwrap();
        assert_eq!(notices.try_recv().unwrap(), AuthNotice::SessionExpired);
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), AuthState::SignedOut);
        assert_eq!(tokens.get_token().await, None);
    }

    #[test]
    fn test_notice_message() {
        assert_eq!(
            AuthNotice::SessionExpired.message(),
            "Session expired. Please log in again."
        );
    }
}
