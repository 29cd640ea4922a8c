//! Client-side trend aggregation.
//!
//! Pure reductions from fetched [`TrendPoint`]s to per-day series and summary
//! statistics. Nothing here touches the network or keeps state between calls.
//!
//! Days are bucketed by the first ten characters of the sample timestamp
//! (`YYYY-MM-DD`). No timezone conversion happens, so a sample stamped
//! `2024-01-01T23:30:00-05:00` lands on January 1st even though it is January
//! 2nd in UTC.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{DailyRollup, Metric, Side, SidedRollup, TrendPoint, TrendSide};

/// Length of the `YYYY-MM-DD` prefix.
const DAY_KEY_LEN: usize = 10;

/// Days in the "recent" comparison windows.
const RECENT_WINDOW_DAYS: u32 = 7;

// ============================================================================
// Primitives
// ============================================================================

/// Truncates an ISO-8601 timestamp to its day key.
///
/// Returns `None` when the prefix is not a valid calendar date.
pub fn day_key(iso: &str) -> Option<NaiveDate> {
    let prefix = iso.get(..DAY_KEY_LEN)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Arithmetic mean, `None` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Averages the series values that fall in `[end_day - (n - 1), end_day]`.
///
/// `end_day` defaults to the last day in the series. Returns `None` when the
/// series is empty, `n` is zero, or no day falls in the window.
pub fn average_over_last_n_days(
    series: &[DailyRollup],
    n: u32,
    end_day: Option<NaiveDate>,
) -> Option<f64> {
    if n == 0 {
        return None;
    }
    let end = match end_day {
        Some(day) => day,
        None => series.last()?.day,
    };
    let start = end
        .checked_sub_days(Days::new(u64::from(n - 1)))
        .unwrap_or(NaiveDate::MIN);

    let values: Vec<f64> = series
        .iter()
        .filter(|p| p.day >= start && p.day <= end)
        .map(|p| p.value)
        .collect();
    average(&values)
}

// ============================================================================
// Rollups
// ============================================================================

/// Groups samples by day and averages the metric within each day.
///
/// Output days are strictly ascending. Samples without a numeric value for
/// `metric` are skipped.
pub fn rollup_daily(samples: &[TrendPoint], metric: Metric) -> Vec<DailyRollup> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for sample in samples {
        let Some(value) = sample.value(metric) else {
            continue;
        };
        let Some(day) = day_key(&sample.session_date) else {
            continue;
        };
        buckets.entry(day).or_default().push(value);
    }

    buckets
        .into_iter()
        .filter_map(|(day, values)| average(&values).map(|value| DailyRollup { day, value }))
        .collect()
}

/// Groups samples by day, keeping left and right averages apart.
///
/// Samples tagged neither `LEFT` nor `RIGHT` are ignored; a side with no
/// samples on a day stays `None`.
pub fn rollup_daily_by_side(samples: &[TrendPoint], metric: Metric) -> Vec<SidedRollup> {
    let mut buckets: BTreeMap<NaiveDate, (Vec<f64>, Vec<f64>)> = BTreeMap::new();

    for sample in samples {
        let Some(value) = sample.value(metric) else {
            continue;
        };
        let Some(day) = day_key(&sample.session_date) else {
            continue;
        };
        match sample.side {
            Some(Side::Left) => buckets.entry(day).or_default().0.push(value),
            Some(Side::Right) => buckets.entry(day).or_default().1.push(value),
            Some(Side::NotApplicable) | None => {}
        }
    }

    buckets
        .into_iter()
        .map(|(day, (left, right))| SidedRollup {
            day,
            left: average(&left),
            right: average(&right),
        })
        .collect()
}

/// Reduces a sided rollup to one value per day.
///
/// `Both` averages whichever sides are present; `Left`/`Right` drop days where
/// that side is missing.
pub fn project_side(by_side: &[SidedRollup], side: TrendSide) -> Vec<DailyRollup> {
    by_side
        .iter()
        .filter_map(|d| {
            let value = match side {
                TrendSide::Left => d.left,
                TrendSide::Right => d.right,
                TrendSide::Both => {
                    let present: Vec<f64> = [d.left, d.right].into_iter().flatten().collect();
                    average(&present)
                }
            }?;
            Some(DailyRollup { day: d.day, value })
        })
        .collect()
}

/// Per-day series for a pose.
///
/// Single-sided poses use [`rollup_daily`]; two-sided poses are split by side
/// and projected with `side`.
pub fn daily_series(
    samples: &[TrendPoint],
    metric: Metric,
    two_sided: bool,
    side: TrendSide,
) -> Vec<DailyRollup> {
    if two_sided {
        project_side(&rollup_daily_by_side(samples, metric), side)
    } else {
        rollup_daily(samples, metric)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Headline statistics over a daily series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Mean of every day in the series.
    pub overall: Option<f64>,
    /// Mean over the last seven days ending on the last day.
    pub last7: Option<f64>,
    /// Mean over the seven days before that.
    pub prev7: Option<f64>,
    /// `last7 - prev7` when both exist.
    pub delta7: Option<f64>,
    /// Number of days in the series.
    pub days: usize,
}

impl TrendSummary {
    /// Computes the summary for an ascending daily series.
    pub fn from_series(series: &[DailyRollup]) -> Self {
        let values: Vec<f64> = series.iter().map(|d| d.value).collect();
        let overall = average(&values);
        let last7 = average_over_last_n_days(series, RECENT_WINDOW_DAYS, None);
        let prev7 = series.last().and_then(|last| {
            let end = last
                .day
                .checked_sub_days(Days::new(u64::from(RECENT_WINDOW_DAYS)))?;
            average_over_last_n_days(series, RECENT_WINDOW_DAYS, Some(end))
        });
        let delta7 = match (last7, prev7) {
            (Some(l), Some(p)) => Some(l - p),
            _ => None,
        };

        Self {
            overall,
            last7,
            prev7,
            delta7,
            days: series.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(date: &str, side: Option<Side>, value: serde_json::Value) -> TrendPoint {
        TrendPoint {
            session_date: date.to_string(),
            side,
            score_card_id: None,
            skipped: false,
            values: [("ease".to_string(), value)].into_iter().collect(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn rollup(s: &str, value: f64) -> DailyRollup {
        DailyRollup { day: day(s), value }
    }

    #[test]
    fn test_day_key_truncates() {
        assert_eq!(day_key("2024-01-01T23:59:59-05:00"), Some(day("2024-01-01")));
        assert_eq!(day_key("2024-01-01"), Some(day("2024-01-01")));
        assert_eq!(day_key("2024-1-1"), None);
        assert_eq!(day_key("garbage-value"), None);
    }

    #[test]
    fn test_average_basics() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[4.5]), Some(4.5));
        assert_eq!(average(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(average(&[6.0, 1.0, 2.0]), average(&[2.0, 6.0, 1.0]));
    }

    #[test]
    fn test_rollup_daily_scenario() {
        let samples = vec![
            sample("2024-01-02T07:00:00Z", None, json!(10)),
            sample("2024-01-01T07:00:00Z", None, json!(4)),
            sample("2024-01-01T18:00:00Z", None, json!(6)),
        ];
        assert_eq!(
            rollup_daily(&samples, Metric::Ease),
            vec![rollup("2024-01-01", 5.0), rollup("2024-01-02", 10.0)]
        );
    }

    #[test]
    fn test_rollup_daily_skips_missing_values() {
        let samples = vec![
            sample("2024-01-01", None, json!(4)),
            sample("2024-01-01", None, json!(null)),
            sample("2024-01-03", None, json!("seven")),
            sample("not-a-date", None, json!(9)),
        ];
        assert_eq!(
            rollup_daily(&samples, Metric::Ease),
            vec![rollup("2024-01-01", 4.0)]
        );
        assert!(rollup_daily(&samples, Metric::Focus).is_empty());
    }

    #[test]
    fn test_rollup_by_side_left_only_day() {
        let samples = vec![
            sample("2024-02-01", Some(Side::Left), json!(3)),
            sample("2024-02-01", Some(Side::Left), json!(5)),
            sample("2024-02-02", Some(Side::Left), json!(2)),
            sample("2024-02-02", Some(Side::Right), json!(8)),
            sample("2024-02-03", Some(Side::NotApplicable), json!(1)),
            sample("2024-02-03", None, json!(1)),
        ];
        let by_side = rollup_daily_by_side(&samples, Metric::Ease);
        assert_eq!(
            by_side,
            vec![
                SidedRollup {
                    day: day("2024-02-01"),
                    left: Some(4.0),
                    right: None
                },
                SidedRollup {
                    day: day("2024-02-02"),
                    left: Some(2.0),
                    right: Some(8.0)
                },
            ]
        );
    }

    #[test]
    fn test_project_side() {
        let by_side = vec![
            SidedRollup {
                day: day("2024-02-01"),
                left: Some(4.0),
                right: None,
            },
            SidedRollup {
                day: day("2024-02-02"),
                left: Some(2.0),
                right: Some(8.0),
            },
        ];
        assert_eq!(
            project_side(&by_side, TrendSide::Both),
            vec![rollup("2024-02-01", 4.0), rollup("2024-02-02", 5.0)]
        );
        assert_eq!(
            project_side(&by_side, TrendSide::Right),
            vec![rollup("2024-02-02", 8.0)]
        );
        assert_eq!(project_side(&by_side, TrendSide::Left).len(), 2);
    }

    #[test]
    fn test_daily_series_single_sided_ignores_side_selection() {
        let samples = vec![
            sample("2024-02-01", Some(Side::Left), json!(2)),
            sample("2024-02-01", None, json!(4)),
        ];
        assert_eq!(
            daily_series(&samples, Metric::Ease, false, TrendSide::Right),
            vec![rollup("2024-02-01", 3.0)]
        );
        assert!(daily_series(&samples, Metric::Ease, true, TrendSide::Right).is_empty());
    }

    #[test]
    fn test_last_n_days_window_is_inclusive() {
        let series = vec![
            rollup("2024-03-01", 1.0),
            rollup("2024-03-04", 3.0),
            rollup("2024-03-07", 5.0),
        ];
        // [03-01, 03-07] covers all three.
        assert_eq!(average_over_last_n_days(&series, 7, None), Some(3.0));
        // [03-02, 03-07]
        assert_eq!(average_over_last_n_days(&series, 6, None), Some(4.0));
        assert_eq!(average_over_last_n_days(&series, 1, None), Some(5.0));
        assert_eq!(average_over_last_n_days(&series, 0, None), None);
        assert_eq!(average_over_last_n_days(&[], 7, None), None);
        assert_eq!(
            average_over_last_n_days(&series, 2, Some(day("2024-03-03"))),
            None
        );
    }

    #[test]
    fn test_large_window_equals_whole_average() {
        let series = vec![
            rollup("2023-01-01", 2.0),
            rollup("2023-06-01", 4.0),
            rollup("2024-01-01", 9.0),
        ];
        let whole = average(&[2.0, 4.0, 9.0]);
        assert_eq!(average_over_last_n_days(&series, 10_000, None), whole);
        assert_eq!(average_over_last_n_days(&series, u32::MAX, None), whole);
    }

    #[test]
    fn test_summary_delta() {
        let series = vec![
            rollup("2024-04-01", 2.0),
            rollup("2024-04-05", 4.0),
            rollup("2024-04-10", 6.0),
            rollup("2024-04-14", 8.0),
        ];
        let summary = TrendSummary::from_series(&series);
        assert_eq!(summary.overall, Some(5.0));
        // last7: [04-08, 04-14] -> 6, 8
        assert_eq!(summary.last7, Some(7.0));
        // prev7: [04-01, 04-07] -> 2, 4
        assert_eq!(summary.prev7, Some(3.0));
        assert_eq!(summary.delta7, Some(4.0));
        assert_eq!(summary.days, 4);
    }

    #[test]
    fn test_summary_without_previous_week() {
        let summary = TrendSummary::from_series(&[rollup("2024-04-14", 8.0)]);
        assert_eq!(summary.last7, Some(8.0));
        assert_eq!(summary.prev7, None);
        assert_eq!(summary.delta7, None);
        assert_eq!(TrendSummary::from_series(&[]), TrendSummary::default());
    }
}
