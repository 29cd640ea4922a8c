//! Pose catalog endpoint and search.

use drishti_core::{Pose, SequenceGroup};
use drishti_fetch::{ApiClient, Query};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::envelope;
use crate::error::ApiError;

/// Pose catalog endpoint.
pub const POSES_ENDPOINT: &str = "pose";

/// Pose catalog endpoints.
#[derive(Debug, Clone)]
pub struct PosesApi {
    client: ApiClient,
}

impl PosesApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists poses in the given groups, one `groups=` pair per group.
    ///
    /// An empty slice asks for the whole catalog.
    #[instrument(skip(self))]
    pub async fn list(&self, groups: &[SequenceGroup]) -> Result<Vec<Pose>, ApiError> {
        let query = Query::new().repeated("groups", groups.iter().map(SequenceGroup::as_str));
        let body: Value = self.client.get(POSES_ENDPOINT, &query).await?;
        let poses: Vec<Pose> = envelope::take(body, "poses")?;
        debug!(count = poses.len(), "Fetched poses");
        Ok(poses)
    }

    /// Poses offered by the trend picker.
    pub async fn picker(&self) -> Result<Vec<Pose>, ApiError> {
        self.list(&SequenceGroup::PICKER).await
    }
}

/// Filters poses by a search string, keeping catalog order.
///
/// Matches slug, Sanskrit name, English name, or sequence group without
/// regard to case. A blank query keeps everything.
pub fn filter_poses<'a>(poses: &'a [Pose], query: &str) -> Vec<&'a Pose> {
    poses.iter().filter(|p| p.matches(query)).collect()
}
