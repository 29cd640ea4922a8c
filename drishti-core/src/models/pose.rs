//! Pose catalog types.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Sequence Group
// ============================================================================

/// Series a pose belongs to in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceGroup {
    /// Sun salutations A and B.
    SunSalutations,
    /// Standing sequence.
    Standing,
    /// Primary series.
    Primary,
    /// Intermediate series.
    Intermediate,
    /// Advanced A series.
    AdvancedA,
    /// Advanced B series.
    AdvancedB,
    /// Finishing sequence.
    Finishing,
}

impl SequenceGroup {
    /// Groups offered when building a custom session or picking a trend pose.
    pub const PICKER: [SequenceGroup; 4] = [
        SequenceGroup::Primary,
        SequenceGroup::Intermediate,
        SequenceGroup::AdvancedA,
        SequenceGroup::AdvancedB,
    ];

    /// Wire name, e.g. `ADVANCED_A`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceGroup::SunSalutations => "SUN_SALUTATIONS",
            SequenceGroup::Standing => "STANDING",
            SequenceGroup::Primary => "PRIMARY",
            SequenceGroup::Intermediate => "INTERMEDIATE",
            SequenceGroup::AdvancedA => "ADVANCED_A",
            SequenceGroup::AdvancedB => "ADVANCED_B",
            SequenceGroup::Finishing => "FINISHING",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SequenceGroup::SunSalutations => "Sun Salutations",
            SequenceGroup::Standing => "Standing",
            SequenceGroup::Primary => "Primary",
            SequenceGroup::Intermediate => "Intermediate",
            SequenceGroup::AdvancedA => "Advanced A",
            SequenceGroup::AdvancedB => "Advanced B",
            SequenceGroup::Finishing => "Finishing",
        }
    }
}

impl fmt::Display for SequenceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SequenceGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "SUN_SALUTATIONS" => Ok(SequenceGroup::SunSalutations),
            "STANDING" => Ok(SequenceGroup::Standing),
            "PRIMARY" => Ok(SequenceGroup::Primary),
            "INTERMEDIATE" => Ok(SequenceGroup::Intermediate),
            "ADVANCED_A" => Ok(SequenceGroup::AdvancedA),
            "ADVANCED_B" => Ok(SequenceGroup::AdvancedB),
            "FINISHING" => Ok(SequenceGroup::Finishing),
            _ => Err(format!("unknown sequence group: {s}")),
        }
    }
}

// ============================================================================
// Side
// ============================================================================

/// Left/right variant of a two-sided pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left side.
    #[serde(rename = "LEFT")]
    Left,
    /// Right side.
    #[serde(rename = "RIGHT")]
    Right,
    /// Not applicable (single-sided pose).
    #[serde(rename = "NA")]
    NotApplicable,
}

impl Side {
    /// Parses the wire value, returning `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Side> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" | "L" => Some(Side::Left),
            "RIGHT" | "R" => Some(Side::Right),
            "NA" => Some(Side::NotApplicable),
            _ => None,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
            Side::NotApplicable => "NA",
        }
    }

    /// True for `LEFT` or `RIGHT`.
    pub fn is_sided(&self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserializes an optional side, mapping unknown strings to `None`.
pub(crate) fn lenient_side<'de, D>(deserializer: D) -> Result<Option<Side>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Side::parse))
}

// ============================================================================
// Pose
// ============================================================================

/// A pose from the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    /// Pose identifier (used by the trend route).
    pub id: String,
    /// URL-safe slug.
    pub slug: String,
    /// Sanskrit name.
    pub sanskrit_name: String,
    /// English name, when the catalog has one.
    #[serde(default)]
    pub english_name: Option<String>,
    /// Series the pose belongs to (kept as the raw wire string).
    pub sequence_group: String,
    /// Whether the pose is practiced on both sides.
    #[serde(default)]
    pub is_two_sided: bool,
}

impl Pose {
    /// Parsed sequence group, if recognized.
    pub fn group(&self) -> Option<SequenceGroup> {
        self.sequence_group.parse().ok()
    }

    /// Case-insensitive match against slug, names, and group.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.slug.to_lowercase().contains(&q)
            || self.sanskrit_name.to_lowercase().contains(&q)
            || self
                .english_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&q))
            || self.sequence_group.to_lowercase().contains(&q)
    }
}

/// Pose reference embedded in session and score card payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseRef {
    /// Slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Sanskrit name.
    #[serde(default)]
    pub sanskrit_name: Option<String>,
    /// Series name.
    #[serde(default)]
    pub sequence_group: Option<String>,
}

impl PoseRef {
    /// Best available display name.
    pub fn display_name(&self) -> &str {
        self.sanskrit_name
            .as_deref()
            .or(self.slug.as_deref())
            .unwrap_or("Pose")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose() -> Pose {
        Pose {
            id: "p1".to_string(),
            slug: "utthita-trikonasana".to_string(),
            sanskrit_name: "Utthita Trikonasana".to_string(),
            english_name: Some("Extended Triangle".to_string()),
            sequence_group: "STANDING".to_string(),
            is_two_sided: true,
        }
    }

    #[test]
    fn test_pose_matches_any_name() {
        let p = pose();
        assert!(p.matches("TRIKON"));
        assert!(p.matches("triangle"));
        assert!(p.matches("standing"));
        assert!(p.matches(""));
        assert!(!p.matches("bakasana"));
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("LEFT"), Some(Side::Left));
        assert_eq!(Side::parse("r"), Some(Side::Right));
        assert_eq!(Side::parse("NA"), Some(Side::NotApplicable));
        assert_eq!(Side::parse("both"), None);
    }

    #[test]
    fn test_sequence_group_from_str() {
        assert_eq!("advanced-a".parse(), Ok(SequenceGroup::AdvancedA));
        assert_eq!("Primary".parse(), Ok(SequenceGroup::Primary));
        assert!("yin".parse::<SequenceGroup>().is_err());
    }

    #[test]
    fn test_pose_deserialize_camel_case() {
        let json = r#"{"id":"1","slug":"bakasana","sanskritName":"Bakasana","sequenceGroup":"INTERMEDIATE"}"#;
        let p: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(p.group(), Some(SequenceGroup::Intermediate));
        assert!(!p.is_two_sided);
        assert!(p.english_name.is_none());
    }
}
