//! Score card endpoints.

use drishti_core::{ScoreCard, ScoreCardUpdate};
use drishti_fetch::{ApiClient, Query, RequestError, path_segment};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::envelope;
use crate::error::ApiError;

/// Score card endpoint prefix.
pub const SCORE_CARD_ENDPOINT: &str = "score-card";

/// Score card endpoints.
#[derive(Debug, Clone)]
pub struct ScoreCardsApi {
    client: ApiClient,
}

impl ScoreCardsApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches a score card.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<ScoreCard, ApiError> {
        let body: Value = self.client.get(&card_path(id)?, &Query::new()).await?;
        Ok(envelope::take(body, "scoreCard")?)
    }

    /// Sends a partial update and returns the server's copy of the card.
    ///
    /// Metric ranges are checked before the request. An empty update is
    /// still sent, matching a save with no edits.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: &ScoreCardUpdate) -> Result<ScoreCard, ApiError> {
        update.validate()?;
        let body: Value = self.client.patch(&card_path(id)?, update).await?;
        let card: ScoreCard = envelope::take(body, "scoreCard")?;
        debug!(id = %card.id, "Score card updated");
        Ok(card)
    }

    /// Updates a card and folds the result into `current`.
    ///
    /// The server may omit the pose from a PATCH reply; the cached pose is kept then.
    pub async fn update_in_place(
        &self,
        current: &mut ScoreCard,
        update: &ScoreCardUpdate,
    ) -> Result<(), ApiError> {
        let updated = self.update(&current.id, update).await?;
        current.merge_update(updated);
        Ok(())
    }
}

fn card_path(id: &str) -> Result<String, RequestError> {
    Ok(format!("{SCORE_CARD_ENDPOINT}/{}", path_segment(id)?))
}
