//! Authenticated JSON client for the Drishti backend.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::RequestError;
use crate::host::token::{MemoryTokenStore, TokenStore};
use crate::unauthorized::{UnauthorizedEvent, UnauthorizedListener, UnauthorizedNotifier};

const USER_AGENT: &str = concat!("drishti/", env!("CARGO_PKG_VERSION"));

const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// Query
// ============================================================================

/// Ordered query parameters. `None` values are omitted; keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, Option<String>)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), Some(value.to_string())));
        self
    }

    /// Appends a parameter that is skipped when `value` is `None`.
    #[must_use]
    pub fn opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.pairs.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Appends one `key=value` pair per item.
    #[must_use]
    pub fn repeated<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.pairs.push((key.to_string(), Some(value.to_string())));
        }
        self
    }

    /// Pairs that will be sent.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }
}

/// Percent-encodes a caller-supplied id for use as one path segment.
///
/// Empty, `.` and `..` are rejected since they would address a different resource.
pub fn path_segment(raw: &str) -> Result<Cow<'_, str>, RequestError> {
    match raw.trim() {
        "" | "." | ".." => Err(RequestError::InvalidUrl(format!("invalid path segment: {raw:?}"))),
        _ => Ok(urlencoding::encode(raw)),
    }
}

// ============================================================================
// Request Options
// ============================================================================

/// Per-request switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Report a 401 to the unauthorized listener.
    pub notify_unauthorized: bool,
}

impl RequestOptions {
    /// Credential exchange: a 401 means bad credentials, not an expired session.
    pub const CREDENTIALS: Self = Self {
        notify_unauthorized: false,
    };
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            notify_unauthorized: true,
        }
    }
}

// ============================================================================
// Request Body
// ============================================================================

/// Body attached to a request.
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON-encoded body.
    Json(Value),
    /// Multipart form; the transport sets its own content type.
    Multipart(reqwest::multipart::Form),
}

impl std::fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Json(v) => f.debug_tuple("Json").field(v).finish(),
            RequestBody::Multipart(_) => f.write_str("Multipart(..)"),
        }
    }
}

impl RequestBody {
    /// Serializes `body` as a JSON request body.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, RequestError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| RequestError::Encode(e.to_string()))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl ApiClientBuilder {
    /// Sets a transport timeout applied to every request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the token store consulted before each request.
    #[must_use]
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Builds the client. Fails if the base URL is not absolute.
    pub fn build(self) -> Result<ApiClient, RequestError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| RequestError::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ApiClient {
            inner: builder.build()?,
            base_url,
            tokens: self
                .tokens
                .unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
            unauthorized: UnauthorizedNotifier::new(),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client that attaches the bearer token and normalizes errors.
///
/// Clones share the token store and the unauthorized listener slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    unauthorized: UnauthorizedNotifier,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("unauthorized", &self.unauthorized)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Starts building a client for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            base_url: base_url.into(),
            timeout: None,
            tokens: None,
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token store shared with the auth layer.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    /// Registers the single unauthorized listener, replacing any previous one.
    pub fn listen_unauthorized(&self) -> UnauthorizedListener {
        self.unauthorized.register()
    }

    /// Deregisters the unauthorized listener.
    pub fn clear_unauthorized_listener(&self) {
        self.unauthorized.clear();
    }

    /// Notification slot, for callers that manage registration ids.
    pub fn unauthorized(&self) -> &UnauthorizedNotifier {
        &self.unauthorized
    }

    /// Joins `path` onto the base URL and appends the query.
    pub fn build_url(&self, path: &str, query: &Query) -> Result<Url, RequestError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url =
            Url::parse(&joined).map_err(|e| RequestError::InvalidUrl(format!("{joined}: {e}")))?;

        let mut present = query.present().peekable();
        if present.peek().is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in present {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends a request and returns the JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: &Query,
    ) -> Result<Value, RequestError> {
        self.request_with(method, path, body, query, RequestOptions::default())
            .await
    }

    /// Sends a request with explicit [`RequestOptions`].
    #[instrument(skip(self, body, query, options), fields(method = %method, path = %path))]
    pub async fn request_with(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Value, RequestError> {
        let url = self.build_url(path, query)?;
        let mut builder = self.inner.request(method, url);

        builder = match body {
            RequestBody::Multipart(form) => builder.multipart(form),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Empty => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
        };

        if let Some(token) = self.tokens.get_token().await {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response");
            RequestError::Network(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Response received");

        if !status.is_success() {
            let error = error_from_body(status, &text);
            if status == StatusCode::UNAUTHORIZED && !options.notify_unauthorized {
                debug!("401 on credential exchange, listener not notified");
            } else if status == StatusCode::UNAUTHORIZED {
                self.unauthorized.notify(UnauthorizedEvent {
                    status: status.as_u16(),
                    path: path.to_string(),
                    message: error.to_string(),
                });
            }
            return Err(error);
        }

        Ok(success_body(&text))
    }

    /// Sends a request and decodes the JSON body into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: &Query,
    ) -> Result<T, RequestError> {
        self.request_json_with(method, path, body, query, RequestOptions::default())
            .await
    }

    async fn request_json_with<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        query: &Query,
        options: RequestOptions,
    ) -> Result<T, RequestError> {
        let value = self.request_with(method, path, body, query, options).await?;
        serde_json::from_value(value).map_err(|e| RequestError::Decode(format!("{path}: {e}")))
    }

    /// `GET path?query`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, RequestError> {
        self.request_json(Method::GET, path, RequestBody::Empty, query)
            .await
    }

    /// `POST path` with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::POST, path, RequestBody::json(body)?, &Query::new())
            .await
    }

    /// `POST path` for login and signup. A 401 is returned without notifying the listener.
    pub async fn post_credentials<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json_with(
            Method::POST,
            path,
            RequestBody::json(body)?,
            &Query::new(),
            RequestOptions::CREDENTIALS,
        )
        .await
    }

    /// `PUT path` with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::PUT, path, RequestBody::json(body)?, &Query::new())
            .await
    }

    /// `PATCH path` with a JSON body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::PATCH, path, RequestBody::json(body)?, &Query::new())
            .await
    }

    /// `DELETE path`, optionally with a JSON body.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RequestError> {
        let body = body.map_or(RequestBody::Empty, |b| RequestBody::Json(b.clone()));
        self.request_json(Method::DELETE, path, body, &Query::new())
            .await
    }
}

// ============================================================================
// Body Handling
// ============================================================================

/// Builds the error for a non-2xx response.
///
/// Message precedence: JSON `error`, JSON `message`, raw text, `HTTP <status>`.
/// A non-JSON body is kept in `data` as a string.
fn error_from_body(status: StatusCode, text: &str) -> RequestError {
    let data: Option<Value> = serde_json::from_str(text).ok().or_else(|| {
        (!text.trim().is_empty()).then(|| Value::String(text.to_string()))
    });

    let from_json = data.as_ref().and_then(|v| {
        ["error", "message"].iter().find_map(|key| {
            v.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        })
    });

    let message = from_json
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    RequestError::Http {
        status: status.as_u16(),
        message,
        data,
    }
}

/// Parses a 2xx body. Empty is `{}`, plain text is wrapped as `{"raw": ..}`.
fn success_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(text).unwrap_or_else(|_| {
        let mut raw = Map::new();
        raw.insert("raw".to_string(), Value::String(text.to_string()));
        Value::Object(raw)
    })
}
