// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Drishti API
//!
//! Typed wrappers over [`drishti_fetch::ApiClient`], one per backend area.
//!
//! | Type | Endpoints |
//! |------|-----------|
//! | [`AuthApi`] | `auth/login`, `auth/signup` |
//! | [`SessionsApi`] | `session`, `session/{id}`, `session/{id}/publish` |
//! | [`ScoreCardsApi`] | `score-card/{id}` |
//! | [`PosesApi`] | `pose` |
//! | [`TrendsApi`] | `pose/{id}/trend` |
//! | [`AccountApi`] | `account` |
//!
//! Every wrapper is a cheap clone of the shared client, so they all see the
//! same token store and unauthorized listener.

pub mod account;
pub mod auth;
mod envelope;
pub mod error;
pub mod poses;
pub mod score_cards;
pub mod sessions;
pub mod trends;

pub use account::AccountApi;
pub use auth::{AuthApi, LoginResponse};
pub use error::{ApiError, PublishError};
pub use poses::{PosesApi, filter_poses};
pub use score_cards::ScoreCardsApi;
pub use sessions::{DEFAULT_PAGE_SIZE, SessionsApi};
pub use trends::{PoseTrend, TrendQuery, TrendsApi};

use drishti_core::{ScoreCard, ScoreCardUpdate};
use drishti_fetch::ApiClient;

/// All endpoint groups over one client.
#[derive(Debug, Clone)]
pub struct DrishtiApi {
    /// Login and signup.
    pub auth: AuthApi,
    /// Practice sessions.
    pub sessions: SessionsApi,
    /// Score cards.
    pub score_cards: ScoreCardsApi,
    /// Pose catalog.
    pub poses: PosesApi,
    /// Pose trends.
    pub trends: TrendsApi,
    /// Account management.
    pub account: AccountApi,
}

impl DrishtiApi {
    /// Builds every endpoint group on `client`.
    pub fn new(client: &ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            sessions: SessionsApi::new(client.clone()),
            score_cards: ScoreCardsApi::new(client.clone()),
            poses: PosesApi::new(client.clone()),
            trends: TrendsApi::new(client.clone()),
            account: AccountApi::new(client.clone()),
        }
    }

    /// Updates a score card unless its session is published.
    ///
    /// # Errors
    ///
    /// [`ValidationError::SessionPublished`](drishti_core::ValidationError::SessionPublished)
    /// before any PATCH is sent, or any endpoint failure.
    pub async fn edit_score_card(
        &self,
        id: &str,
        update: &ScoreCardUpdate,
    ) -> Result<ScoreCard, ApiError> {
        let current = self.score_cards.get(id).await?;
        if let Some(session_id) = current.session_id.as_deref() {
            self.sessions.get(session_id).await?.ensure_editable()?;
        }
        self.score_cards.update(id, update).await
    }
}
