// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Drishti Store
//!
//! Client state for Drishti.
//!
//! - **AuthStore**: Signed-in state machine, kept in step with the token store
//! - **SettingsStore**: Client preferences with persistence
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use drishti_store::{AuthStore, SettingsStore};
//!
//! let settings = SettingsStore::load_default().await;
//! let client = ApiClient::builder(base_url).token_store(tokens).build()?;
//!
//! let auth = AuthStore::new(&client);
//! let _guard = auth.attach(&client);
//! auth.initialize().await;
//!
//! let mut notices = auth.notices();
//! while let Ok(notice) = notices.recv().await {
//!     eprintln!("{}", notice.message());
//! }
//! ```

pub mod auth_store;
pub mod error;
pub mod persistence;
pub mod settings_store;

pub use auth_store::{AuthListenerGuard, AuthNotice, AuthState, AuthStore, SignOutReason};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use settings_store::{BASE_URL_ENV, Settings, SettingsStore, validate_base_url};
