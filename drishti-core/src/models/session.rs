//! Practice session types.
//!
//! - [`PracticeSession`] - list entry
//! - [`SessionDetail`] - session with its ordered score cards
//! - [`PublishConflict`] - why the backend refused to publish
//! - [`Paginated`] - cursor page envelope

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::pose::{PoseRef, SequenceGroup, Side, lenient_side};
use crate::error::ValidationError;

// ============================================================================
// Status & Practice Type
// ============================================================================

/// Lifecycle status of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Being recorded; editable.
    Draft,
    /// Published; scores are final.
    Published,
    /// Archived.
    Archived,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Draft => write!(f, "DRAFT"),
            SessionStatus::Published => write!(f, "PUBLISHED"),
            SessionStatus::Archived => write!(f, "ARCHIVED"),
        }
    }
}

/// Preset practice types plus custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PracticeType {
    /// Half primary series.
    HalfPrimary,
    /// Full primary series.
    FullPrimary,
    /// Intermediate series.
    Intermediate,
    /// Advanced A series.
    AdvancedA,
    /// Advanced B series.
    AdvancedB,
    /// Built from sequence snippets.
    Custom,
}

impl PracticeType {
    /// Preset types, in display order.
    pub const PRESETS: [PracticeType; 5] = [
        PracticeType::HalfPrimary,
        PracticeType::FullPrimary,
        PracticeType::Intermediate,
        PracticeType::AdvancedA,
        PracticeType::AdvancedB,
    ];

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PracticeType::HalfPrimary => "Half Primary",
            PracticeType::FullPrimary => "Full Primary",
            PracticeType::Intermediate => "Intermediate",
            PracticeType::AdvancedA => "Advanced A",
            PracticeType::AdvancedB => "Advanced B",
            PracticeType::Custom => "Custom",
        }
    }
}

impl FromStr for PracticeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "HALF_PRIMARY" => Ok(PracticeType::HalfPrimary),
            "FULL_PRIMARY" => Ok(PracticeType::FullPrimary),
            "INTERMEDIATE" => Ok(PracticeType::Intermediate),
            "ADVANCED_A" => Ok(PracticeType::AdvancedA),
            "ADVANCED_B" => Ok(PracticeType::AdvancedB),
            "CUSTOM" => Ok(PracticeType::Custom),
            _ => Err(format!("unknown practice type: {s}")),
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// A practice session as it appears in the session list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    /// Session identifier.
    pub id: String,
    /// ISO-8601 date of the practice.
    pub date: String,
    /// Optional user label.
    #[serde(default)]
    pub label: Option<String>,
    /// Practice type wire name.
    #[serde(default)]
    pub practice_type: Option<String>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Backend-computed overall score.
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Self-reported energy level.
    #[serde(default)]
    pub energy_level: Option<f64>,
    /// Self-reported mood.
    #[serde(default)]
    pub mood: Option<f64>,
}

impl PracticeSession {
    /// Label to show when the user did not set one.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or("Practice Session")
    }
}

/// Score card entry inside a session detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCardSummary {
    /// Score card identifier.
    pub id: String,
    /// Side for two-sided poses.
    #[serde(default, deserialize_with = "lenient_side")]
    pub side: Option<Side>,
    /// Backend-computed score.
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Pose this card scores.
    #[serde(default)]
    pub pose: PoseRef,
    /// Whether every required field is filled.
    #[serde(default)]
    pub is_complete: bool,
}

/// Full session with ordered score cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    /// Session identifier.
    pub id: String,
    /// ISO-8601 date.
    #[serde(default)]
    pub date: Option<String>,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<SessionStatus>,
    /// Overall score.
    #[serde(default)]
    pub overall_score: Option<f64>,
    /// Score cards in practice order.
    #[serde(default)]
    pub score_cards: Vec<ScoreCardSummary>,
}

impl SessionDetail {
    /// Number of cards still missing data.
    pub fn incomplete_count(&self) -> usize {
        self.score_cards.iter().filter(|c| !c.is_complete).count()
    }

    /// Fails for published sessions, whose cards cannot be edited.
    pub fn ensure_editable(&self) -> Result<(), ValidationError> {
        if self.status == Some(SessionStatus::Published) {
            Err(ValidationError::SessionPublished)
        } else {
            Ok(())
        }
    }

    /// Neighbours of a card in practice order, for prev/next navigation.
    pub fn neighbours(&self, card_id: &str) -> (Option<&str>, Option<&str>) {
        let Some(idx) = self.score_cards.iter().position(|c| c.id == card_id) else {
            return (None, None);
        };
        let prev = idx
            .checked_sub(1)
            .and_then(|i| self.score_cards.get(i))
            .map(|c| c.id.as_str());
        let next = self.score_cards.get(idx + 1).map(|c| c.id.as_str());
        (prev, next)
    }
}

/// Minimal session returned by publish and create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    /// Session identifier.
    pub id: String,
    /// Status after the operation.
    #[serde(default)]
    pub status: Option<SessionStatus>,
    /// Overall score, once published.
    #[serde(default)]
    pub overall_score: Option<f64>,
}

// ============================================================================
// Create requests
// ============================================================================

/// Request body for a preset session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSessionRequest {
    /// One of the preset practice types.
    pub practice_type: PracticeType,
    /// Optional label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// A run of poses from one group, up to and including a pose slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceSnippet {
    /// Group the snippet is drawn from.
    pub group: SequenceGroup,
    /// Last pose slug included.
    pub up_to_slug: String,
}

/// Request body for a custom session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSessionRequest {
    /// Always [`PracticeType::Custom`].
    pub practice_type: PracticeType,
    /// Optional label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Snippets in practice order.
    pub sequence_snippets: Vec<SequenceSnippet>,
}

impl CustomSessionRequest {
    /// Builds a custom request, dropping snippets without a target slug.
    pub fn new(label: Option<String>, duration: Option<u32>, snippets: Vec<SequenceSnippet>) -> Self {
        Self {
            practice_type: PracticeType::Custom,
            label: label.filter(|l| !l.trim().is_empty()),
            duration,
            sequence_snippets: snippets
                .into_iter()
                .filter(|s| !s.up_to_slug.trim().is_empty())
                .collect(),
        }
    }
}

// ============================================================================
// Publish conflict
// ============================================================================

/// Details from a 409 publish response naming the blocking score card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishConflict {
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
    /// Score card that must be fixed first.
    pub score_card_id: String,
    /// Pose of that card.
    #[serde(default)]
    pub pose: Option<PoseRef>,
    /// Side of that card.
    #[serde(default, deserialize_with = "lenient_side")]
    pub side: Option<Side>,
    /// Fields still missing.
    #[serde(default)]
    pub missing: Vec<String>,
}

impl PublishConflict {
    /// Extracts conflict details from a structured error payload.
    pub fn from_payload(data: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(data.clone()).ok()
    }

    /// One-line description, e.g. `Incomplete card Bakasana • LEFT (missing: ease)`.
    pub fn describe(&self) -> String {
        let mut label = self
            .pose
            .as_ref()
            .map_or("Pose", PoseRef::display_name)
            .to_string();
        if let Some(side) = self.side.filter(Side::is_sided) {
            label.push_str(" • ");
            label.push_str(side.as_str());
        }
        let mut out = match self.message.as_deref() {
            Some(m) if !m.is_empty() => format!("{m} {label}"),
            _ => label,
        };
        if !self.missing.is_empty() {
            out.push_str(&format!(" (missing: {})", self.missing.join(", ")));
        }
        out
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Cursor-paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Cursor for the next page, absent on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
    /// True when another page can be requested.
    pub fn has_next(&self) -> bool {
        self.next_cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}
