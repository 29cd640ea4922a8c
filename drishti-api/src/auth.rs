//! Login and signup endpoints.
//!
//! ```text
//! POST auth/login   {"email", "password"}          -> {"token", "user"?}
//! POST auth/signup  {"name", "email", "password"}  -> {...}
//! ```

use drishti_core::validation::require_credentials;
use drishti_core::{CoreError, ValidationError};
use drishti_fetch::ApiClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ApiError;

/// Login endpoint.
pub const LOGIN_ENDPOINT: &str = "auth/login";

/// Signup endpoint.
pub const SIGNUP_ENDPOINT: &str = "auth/signup";

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// User record, when the backend includes one.
    #[serde(default)]
    pub user: Option<Value>,
}

/// Authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token. Empty input never reaches the network.
    ///
    /// A 401 here means wrong credentials and is not reported as an expired session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        require_credentials(email, password)?;

        let response: LoginResponse = self
            .client
            .post_credentials(LOGIN_ENDPOINT, &LoginBody { email, password })
            .await?;

        if response.token.is_empty() {
            return Err(CoreError::InvalidData("login response has an empty token".to_string()).into());
        }
        debug!("Login accepted");
        Ok(response)
    }

    /// Creates an account. The response is returned as-is; it does not
    /// sign the user in. Form rules live in
    /// [`Registration::validate`](drishti_core::Registration::validate).
    #[instrument(skip(self, password))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Value, ApiError> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        require_credentials(email, password)?;

        let body = SignupBody {
            name,
            email,
            password,
        };
        Ok(self.client.post_credentials(SIGNUP_ENDPOINT, &body).await?)
    }
}
