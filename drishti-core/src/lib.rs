// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Drishti Core
//!
//! Core types, validation, and trend aggregation for Drishti.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models (sessions, score cards, poses, trend points)
//! - Client-side validation of form input
//! - Pure trend aggregation over fetched samples
//!
//! ## Key Types
//!
//! ### Sessions
//! - [`PracticeSession`] - Session list entry
//! - [`SessionDetail`] - Session with ordered score cards
//! - [`PublishConflict`] - Blocking card reported by a 409 publish
//!
//! ### Score Cards
//! - [`ScoreCard`] - Recorded metrics for one pose
//! - [`ScoreCardUpdate`] - Tri-state partial update
//!
//! ### Trends
//! - [`TrendPoint`] - One fetched observation
//! - [`DailyRollup`] / [`SidedRollup`] - Per-day aggregates
//! - [`TrendSummary`] - Overall, last-7, previous-7, and delta

pub mod aggregate;
pub mod error;
pub mod models;
pub mod validation;

pub use aggregate::{
    TrendSummary, average, average_over_last_n_days, daily_series, day_key, project_side,
    rollup_daily, rollup_daily_by_side,
};
pub use error::{CoreError, ValidationError};
pub use models::{
    CustomSessionRequest, DailyRollup, METRIC_MAX, METRIC_MIN, Metric, Paginated, Pose, PoseRef,
    PracticeSession, PracticeType, PresetSessionRequest, PublishConflict, ScoreCard,
    ScoreCardSummary, ScoreCardUpdate, SequenceGroup, SequenceSnippet, SessionDetail, SessionRef,
    SessionStatus, Side, SidedRollup, TrendPoint, TrendResponse, TrendSide, TrendWindow,
};
pub use validation::Registration;
