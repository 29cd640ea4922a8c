//! Domain models for Drishti.
//!
//! ## Submodules
//!
//! - [`pose`] - Pose catalog, sides, sequence groups
//! - [`session`] - Practice sessions, publish conflicts, pagination
//! - [`score_card`] - Score cards and partial updates
//! - [`trend`] - Metrics, windows, raw trend points, rollups

mod pose;
mod score_card;
mod session;
mod trend;

pub use pose::{Pose, PoseRef, SequenceGroup, Side};
pub use score_card::{METRIC_MAX, METRIC_MIN, ScoreCard, ScoreCardUpdate};
pub use session::{
    CustomSessionRequest, Paginated, PracticeSession, PracticeType, PresetSessionRequest,
    PublishConflict, ScoreCardSummary, SequenceSnippet, SessionDetail, SessionRef, SessionStatus,
};
pub use trend::{
    DailyRollup, Metric, SidedRollup, TrendPoint, TrendResponse, TrendSide, TrendWindow,
};
