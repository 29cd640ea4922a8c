//! Practice session endpoints.
//!
//! ```text
//! GET    session?limit&cursor   -> {"items": [...], "nextCursor"}
//! GET    session/{id}           -> {"session": {...}}
//! POST   session                -> {"session": {...}}
//! PUT    session/{id}/publish   -> {"session": {...}}   409 names the blocking card
//! DELETE session/{id}
//! ```

use drishti_core::{
    CustomSessionRequest, Paginated, PracticeSession, PresetSessionRequest, SessionDetail,
    SessionRef,
};
use drishti_fetch::{ApiClient, Query, RequestError, path_segment};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::envelope;
use crate::error::{ApiError, PublishError};

/// Session collection endpoint.
pub const SESSIONS_ENDPOINT: &str = "session";

/// Page size used when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Session endpoints.
#[derive(Debug, Clone)]
pub struct SessionsApi {
    client: ApiClient,
}

impl SessionsApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches one page of sessions, newest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Paginated<PracticeSession>, ApiError> {
        let query = Query::new()
            .param("limit", limit)
            .opt("cursor", cursor.filter(|c| !c.is_empty()));
        let page: Paginated<PracticeSession> = self.client.get(SESSIONS_ENDPOINT, &query).await?;
        debug!(count = page.items.len(), has_next = page.has_next(), "Fetched sessions");
        Ok(page)
    }

    /// Fetches a session with its score cards.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<SessionDetail, ApiError> {
        let body: Value = self.client.get(&session_path(id)?, &Query::new()).await?;
        Ok(envelope::take(body, "session")?)
    }

    /// Creates a session from a preset practice type.
    #[instrument(skip(self, request), fields(practice_type = ?request.practice_type))]
    pub async fn create_preset(
        &self,
        request: &PresetSessionRequest,
    ) -> Result<SessionDetail, ApiError> {
        self.create(json!(request)).await
    }

    /// Creates a custom session from sequence snippets.
    #[instrument(skip(self, request), fields(snippets = request.sequence_snippets.len()))]
    pub async fn create_custom(
        &self,
        request: &CustomSessionRequest,
    ) -> Result<SessionDetail, ApiError> {
        self.create(json!(request)).await
    }

    async fn create(&self, body: Value) -> Result<SessionDetail, ApiError> {
        let response: Value = self.client.post(SESSIONS_ENDPOINT, &body).await?;
        let session: SessionDetail = envelope::take(response, "session")?;
        info!(id = %session.id, "Session created");
        Ok(session)
    }

    /// Publishes a draft session.
    ///
    /// A 409 whose body names a score card becomes [`PublishError::Conflict`].
    #[instrument(skip(self))]
    pub async fn publish(&self, id: &str) -> Result<SessionRef, PublishError> {
        let path = format!("{}/publish", session_path(id)?);
        let response: Value = self.client.put(&path, &json!({})).await?;
        let session: SessionRef = envelope::take(response, "session").map_err(ApiError::from)?;
        info!(id = %session.id, "Session published");
        Ok(session)
    }

    /// Deletes a session.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: Value = self.client.delete(&session_path(id)?, None).await?;
        info!(id = %id, "Session deleted");
        Ok(())
    }
}

fn session_path(id: &str) -> Result<String, RequestError> {
    Ok(format!("{SESSIONS_ENDPOINT}/{}", path_segment(id)?))
}
