//! Trend types: metrics, windows, raw points, and rollups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::pose::{Side, lenient_side};

// ============================================================================
// Metric
// ============================================================================

/// Metric that can be charted over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Backend-computed overall score.
    OverallScore,
    /// Ease.
    Ease,
    /// Comfort.
    Comfort,
    /// Stability.
    Stability,
    /// Pain.
    Pain,
    /// Breath.
    Breath,
    /// Focus.
    Focus,
}

impl Metric {
    /// All metrics, in picker order.
    pub const ALL: [Metric; 7] = [
        Metric::OverallScore,
        Metric::Ease,
        Metric::Comfort,
        Metric::Stability,
        Metric::Pain,
        Metric::Breath,
        Metric::Focus,
    ];

    /// Field name used in trend `values` maps and query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::OverallScore => "overallScore",
            Metric::Ease => "ease",
            Metric::Comfort => "comfort",
            Metric::Stability => "stability",
            Metric::Pain => "pain",
            Metric::Breath => "breath",
            Metric::Focus => "focus",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace(['-', '_'], "").to_ascii_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().to_ascii_lowercase() == key || (key == "overall" && *m == Metric::OverallScore))
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}

// ============================================================================
// Side selection & window
// ============================================================================

/// Which side(s) to chart for a two-sided pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendSide {
    /// Average of left and right per day.
    #[default]
    Both,
    /// Left side only.
    Left,
    /// Right side only.
    Right,
}

impl FromStr for TrendSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "b" => Ok(TrendSide::Both),
            "left" | "l" => Ok(TrendSide::Left),
            "right" | "r" => Ok(TrendSide::Right),
            _ => Err(format!("unknown side: {s}")),
        }
    }
}

impl fmt::Display for TrendSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendSide::Both => write!(f, "Both"),
            TrendSide::Left => write!(f, "L"),
            TrendSide::Right => write!(f, "R"),
        }
    }
}

/// How far back a trend request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendWindow {
    /// Last N days.
    Days(u32),
    /// Entire history.
    All,
}

impl TrendWindow {
    /// Windows offered by the trend picker.
    pub const PRESETS: [TrendWindow; 6] = [
        TrendWindow::Days(7),
        TrendWindow::Days(30),
        TrendWindow::Days(90),
        TrendWindow::Days(180),
        TrendWindow::Days(365),
        TrendWindow::All,
    ];

    /// Value sent as the `days` query parameter.
    pub fn query_value(&self) -> String {
        match self {
            TrendWindow::Days(n) => n.to_string(),
            TrendWindow::All => "all".to_string(),
        }
    }
}

impl Default for TrendWindow {
    fn default() -> Self {
        TrendWindow::Days(30)
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendWindow::Days(n) => write!(f, "{n}d"),
            TrendWindow::All => write!(f, "All"),
        }
    }
}

impl FromStr for TrendWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "all" {
            return Ok(TrendWindow::All);
        }
        let digits = s.strip_suffix('d').unwrap_or(&s);
        match digits.parse::<u32>() {
            Ok(n) if n > 0 => Ok(TrendWindow::Days(n)),
            _ => Err(format!("invalid window: {s} (expected e.g. 30, 30d, or all)")),
        }
    }
}

// ============================================================================
// Raw points
// ============================================================================

/// One fetched metric observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// ISO-8601 timestamp of the session.
    pub session_date: String,
    /// Side tag, when the pose is two-sided.
    #[serde(default, deserialize_with = "lenient_side")]
    pub side: Option<Side>,
    /// Score card the values came from.
    #[serde(default)]
    pub score_card_id: Option<String>,
    /// Whether the card was skipped.
    #[serde(default)]
    pub skipped: bool,
    /// Metric name to raw value; non-numbers are treated as missing.
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl TrendPoint {
    /// Numeric value for a metric, if present.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.values.get(metric.as_str()).and_then(serde_json::Value::as_f64)
    }
}

/// Response of the pose trend route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendResponse {
    /// Observations in backend order.
    #[serde(default)]
    pub points: Vec<TrendPoint>,
}

// ============================================================================
// Rollups
// ============================================================================

/// Per-day average of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRollup {
    /// Calendar day.
    pub day: NaiveDate,
    /// Mean value for the day.
    pub value: f64,
}

/// Per-day left/right averages for a two-sided pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SidedRollup {
    /// Calendar day.
    pub day: NaiveDate,
    /// Mean of left-side values, if any.
    pub left: Option<f64>,
    /// Mean of right-side values, if any.
    pub right: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("overallScore".parse(), Ok(Metric::OverallScore));
        assert_eq!("overall_score".parse(), Ok(Metric::OverallScore));
        assert_eq!("overall".parse(), Ok(Metric::OverallScore));
        assert_eq!("Focus".parse(), Ok(Metric::Focus));
        assert!("flexibility".parse::<Metric>().is_err());
    }

    #[test]
    fn test_window_from_str() {
        assert_eq!("7".parse(), Ok(TrendWindow::Days(7)));
        assert_eq!("90d".parse(), Ok(TrendWindow::Days(90)));
        assert_eq!("ALL".parse(), Ok(TrendWindow::All));
        assert!("0".parse::<TrendWindow>().is_err());
        assert!("week".parse::<TrendWindow>().is_err());
        assert_eq!(TrendWindow::All.query_value(), "all");
    }

    #[test]
    fn test_point_value_ignores_non_numbers() {
        let point: TrendPoint = serde_json::from_value(json!({
            "sessionDate": "2024-03-01T08:00:00Z",
            "side": "LEFT",
            "values": { "ease": 6, "focus": null, "pain": "n/a" }
        }))
        .unwrap();
        assert_eq!(point.value(Metric::Ease), Some(6.0));
        assert_eq!(point.value(Metric::Focus), None);
        assert_eq!(point.value(Metric::Pain), None);
        assert_eq!(point.value(Metric::Breath), None);
        assert_eq!(point.side, Some(Side::Left));
    }

    #[test]
    fn test_point_unknown_side_is_absent() {
        let point: TrendPoint = serde_json::from_value(json!({
            "sessionDate": "2024-03-01",
            "side": "CENTER"
        }))
        .unwrap();
        assert!(point.side.is_none());
    }
}
