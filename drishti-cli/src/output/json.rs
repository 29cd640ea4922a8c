//! JSON output formatting.

use anyhow::Result;
use drishti_api::PoseTrend;
use drishti_core::{DailyRollup, Metric, Pose, TrendSide, TrendSummary, TrendWindow};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for `status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub base_url: String,
    pub token_store: String,
    pub signed_in: bool,
}

/// JSON output for `trend`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendOutput {
    pub pose_id: String,
    pub pose: String,
    pub metric: Metric,
    pub window: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<TrendSide>,
    pub summary: TrendSummary,
    pub series: Vec<DayOutput>,
    pub points: usize,
}

/// One day of a trend series.
#[derive(Debug, Serialize)]
pub struct DayOutput {
    pub date: String,
    pub value: f64,
}

impl TrendOutput {
    /// Builds the output for a fetched trend.
    pub fn new(
        pose: &Pose,
        metric: Metric,
        window: TrendWindow,
        side: TrendSide,
        trend: &PoseTrend,
    ) -> Self {
        Self {
            pose_id: pose.id.clone(),
            pose: pose.sanskrit_name.clone(),
            metric,
            window: window.query_value(),
            side: pose.is_two_sided.then_some(side),
            summary: trend.summary,
            series: trend.series.iter().map(DayOutput::from).collect(),
            points: trend.response.points.len(),
        }
    }
}

impl From<&DailyRollup> for DayOutput {
    fn from(day: &DailyRollup) -> Self {
        Self {
            date: day.day.format("%Y-%m-%d").to_string(),
            value: day.value,
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
