//! Score card types.

use serde::{Deserialize, Serialize};

use super::pose::{PoseRef, Side, lenient_side};
use super::trend::Metric;
use crate::error::ValidationError;

/// Lowest value a metric slider accepts.
pub const METRIC_MIN: u8 = 1;

/// Highest value a metric slider accepts.
pub const METRIC_MAX: u8 = 10;

/// One pose's recorded metrics within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    /// Score card identifier.
    pub id: String,
    /// Owning session.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Segment of the practice (backend label).
    #[serde(default)]
    pub segment: Option<String>,
    /// Side for two-sided poses.
    #[serde(default, deserialize_with = "lenient_side")]
    pub side: Option<Side>,
    /// Pose was skipped; metrics are ignored.
    #[serde(default)]
    pub skipped: bool,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// How easy the pose felt.
    #[serde(default)]
    pub ease: Option<f64>,
    /// Comfort in the pose.
    #[serde(default)]
    pub comfort: Option<f64>,
    /// Stability.
    #[serde(default)]
    pub stability: Option<f64>,
    /// Pain level.
    #[serde(default)]
    pub pain: Option<f64>,
    /// Breath quality.
    #[serde(default)]
    pub breath: Option<f64>,
    /// Focus.
    #[serde(default)]
    pub focus: Option<f64>,
    /// Backend-computed score.
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Pose this card scores.
    #[serde(default)]
    pub pose: PoseRef,
}

impl ScoreCard {
    /// Value recorded for a metric.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::OverallScore => self.overall_score,
            Metric::Ease => self.ease,
            Metric::Comfort => self.comfort,
            Metric::Stability => self.stability,
            Metric::Pain => self.pain,
            Metric::Breath => self.breath,
            Metric::Focus => self.focus,
        }
    }

    /// Applies a server response on top of this card.
    ///
    /// PATCH responses may omit nested relations, so the existing pose is kept
    /// when the update carries an empty one.
    pub fn merge_update(&mut self, updated: ScoreCard) {
        let pose = if updated.pose == PoseRef::default() {
            std::mem::take(&mut self.pose)
        } else {
            updated.pose.clone()
        };
        *self = ScoreCard { pose, ..updated };
    }
}

/// Partial update for a score card.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCardUpdate {
    /// Mark the pose as skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    /// Notes text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    /// Side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Option<Side>>,
    /// Ease.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease: Option<Option<u8>>,
    /// Comfort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort: Option<Option<u8>>,
    /// Stability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<Option<u8>>,
    /// Pain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain: Option<Option<u8>>,
    /// Breath.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breath: Option<Option<u8>>,
    /// Focus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<Option<u8>>,
}

impl ScoreCardUpdate {
    /// Sets notes; blank text clears them.
    pub fn with_notes(mut self, notes: &str) -> Self {
        let trimmed = notes.trim();
        self.notes = Some((!trimmed.is_empty()).then(|| notes.to_string()));
        self
    }

    /// Sets or clears a metric by enum.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMetric`] for `overallScore`, which
    /// the backend computes.
    pub fn with_metric(mut self, metric: Metric, value: Option<u8>) -> Result<Self, ValidationError> {
        let slot = match metric {
            Metric::Ease => &mut self.ease,
            Metric::Comfort => &mut self.comfort,
            Metric::Stability => &mut self.stability,
            Metric::Pain => &mut self.pain,
            Metric::Breath => &mut self.breath,
            Metric::Focus => &mut self.focus,
            Metric::OverallScore => {
                return Err(ValidationError::UnknownMetric(metric.as_str().to_string()));
            }
        };
        *slot = Some(value);
        Ok(self)
    }

    /// True when nothing would be sent.
    pub fn is_empty(&self) -> bool {
        self == &ScoreCardUpdate::default()
    }

    /// Checks every metric being set is within the slider range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MetricOutOfRange`] for the first bad value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("ease", self.ease),
            ("comfort", self.comfort),
            ("stability", self.stability),
            ("pain", self.pain),
            ("breath", self.breath),
            ("focus", self.focus),
        ];
        for (metric, value) in fields {
            if let Some(Some(v)) = value {
                if !(METRIC_MIN..=METRIC_MAX).contains(&v) {
                    return Err(ValidationError::MetricOutOfRange {
                        metric,
                        value: v,
                        min: METRIC_MIN,
                        max: METRIC_MAX,
                    });
                }
            }
        }
        Ok(())
    }
}
