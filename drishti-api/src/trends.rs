//! Per-pose trend endpoint.
//!
//! ```text
//! GET pose/{id}/trend?fields=<metric>&days=<n|all>&includeSkipped=<bool>
//!     -> {"points": [{"sessionDate", "side"?, "values": {...}}]}
//! ```

use drishti_core::{
    DailyRollup, Metric, Pose, TrendResponse, TrendSide, TrendSummary, TrendWindow, daily_series,
};
use drishti_fetch::{ApiClient, Query, path_segment};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::poses::POSES_ENDPOINT;

/// Parameters for a trend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendQuery {
    /// Metric to fetch.
    pub metric: Metric,
    /// How far back to reach.
    pub window: TrendWindow,
    /// Whether skipped cards contribute points.
    pub include_skipped: bool,
}

impl Default for TrendQuery {
    fn default() -> Self {
        Self {
            metric: Metric::OverallScore,
            window: TrendWindow::default(),
            include_skipped: false,
        }
    }
}

impl TrendQuery {
    fn to_query(self) -> Query {
        Query::new()
            .param("fields", self.metric.as_str())
            .param("days", self.window.query_value())
            .param("includeSkipped", self.include_skipped)
    }
}

/// A pose trend rolled up to one value per day.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseTrend {
    /// Raw points as returned.
    pub response: TrendResponse,
    /// Daily series for the requested side.
    pub series: Vec<DailyRollup>,
    /// Headline numbers over `series`.
    pub summary: TrendSummary,
}

/// Trend endpoints.
#[derive(Debug, Clone)]
pub struct TrendsApi {
    client: ApiClient,
}

impl TrendsApi {
    /// Wraps a client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches raw trend points for a pose.
    #[instrument(skip(self))]
    pub async fn pose_trend(&self, pose_id: &str, query: TrendQuery) -> Result<TrendResponse, ApiError> {
        let path = format!("{POSES_ENDPOINT}/{}/trend", path_segment(pose_id)?);
        let response: TrendResponse = self.client.get(&path, &query.to_query()).await?;
        debug!(points = response.points.len(), "Fetched trend points");
        Ok(response)
    }

    /// Fetches a pose trend and rolls it up per day.
    ///
    /// `side` only applies to two-sided poses.
    pub async fn pose_series(
        &self,
        pose: &Pose,
        query: TrendQuery,
        side: TrendSide,
    ) -> Result<PoseTrend, ApiError> {
        let response = self.pose_trend(&pose.id, query).await?;
        let series = daily_series(&response.points, query.metric, pose.is_two_sided, side);
        let summary = TrendSummary::from_series(&series);
        Ok(PoseTrend {
            response,
            series,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters() {
        let query = TrendQuery {
            metric: Metric::Stability,
            window: TrendWindow::All,
            include_skipped: true,
        };
        let built = query.to_query();
        let pairs: Vec<(&str, &str)> = built.present().collect();
        assert_eq!(
            pairs,
            vec![("fields", "stability"), ("days", "all"), ("includeSkipped", "true")]
        );
    }
}
