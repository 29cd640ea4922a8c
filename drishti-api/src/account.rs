//! Account endpoint.

use drishti_core::validation::require_password;
use drishti_fetch::ApiClient;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::error::ApiError;

/// Account endpoint.
pub const ACCOUNT_ENDPOINT: &str = "account";

/// Account endpoints.
#[derive(Debug, Clone)]
pub struct AccountApi {
    client: ApiClient,
}

impl AccountApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Permanently deletes the signed-in account. The password is re-checked
    /// by the server; a blank one is rejected locally.
    #[instrument(skip(self, password))]
    pub async fn delete(&self, password: &str) -> Result<(), ApiError> {
        require_password(password)?;
        let body = json!({ "password": password });
        let _: Value = self.client.delete(ACCOUNT_ENDPOINT, Some(&body)).await?;
        info!("Account deleted");
        Ok(())
    }
}
