//! Host APIs the client depends on.
//!
//! - [`token`] - Session token persistence (system keychain or memory)

pub mod token;

pub use token::{KeychainTokenStore, MemoryTokenStore, TokenStore};
