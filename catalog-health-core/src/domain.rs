//! Domain entities shared across the catalog health engine.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Semantic color bucket used by the catalog UI for progress bars and chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorKey {
    /// Healthy / done.
    Green,
    /// Good but not excellent.
    LightGreen,
    /// Fair.
    Amber,
    /// Degraded or in progress.
    Orange,
    /// Failing or badly stale.
    Red,
    /// Waiting (queue, backlog).
    Blue,
    /// Unknown or unavailable.
    Gray,
}

impl ColorKey {
    /// Hex color the catalog UI renders for this bucket.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#4caf50",
            Self::LightGreen => "#8bc34a",
            Self::Amber => "#ffc107",
            Self::Orange => "#ff9800",
            Self::Red => "#f44336",
            Self::Blue => "#2196f3",
            Self::Gray => "#9e9e9e",
        }
    }

    /// Three-band color for health style percentages: >70 green, >30 orange.
    pub fn for_health(percent: u8) -> Self {
        if percent > 70 {
            Self::Green
        } else if percent > 30 {
            Self::Orange
        } else {
            Self::Red
        }
    }
}

/// Qualitative level derived from a completeness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    /// Score of 90 or more.
    Excellent,
    /// Score of 75 to 89.
    Good,
    /// Score of 60 to 74.
    Fair,
    /// Score of 45 to 59.
    Poor,
    /// Score below 45.
    VeryPoor,
}

impl QualityLevel {
    /// Bucket a 0-100 completeness score.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            45..=59 => Self::Poor,
            _ => Self::VeryPoor,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// Color bucket for the level.
    pub fn color(self) -> ColorKey {
        match self {
            Self::Excellent => ColorKey::Green,
            Self::Good => ColorKey::LightGreen,
            Self::Fair => ColorKey::Amber,
            Self::Poor => ColorKey::Orange,
            Self::VeryPoor => ColorKey::Red,
        }
    }
}

/// Outcome of scoring an entity against a field specification table.
///
/// `score == round(100 * filled_weight / total_weight)` when `total_weight > 0`,
/// otherwise `score == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Weighted completeness percentage, 0-100.
    pub score: u8,
    /// Dotted paths of fields that carried a value, in spec order.
    pub filled_fields: Vec<String>,
    /// Dotted paths of fields that were absent, in spec order.
    pub missing_fields: Vec<String>,
    /// Sum of all contributing weights.
    pub total_weight: f64,
    /// Sum of the weights of filled fields.
    pub filled_weight: f64,
}

impl ScoreResult {
    /// Qualitative level for the score.
    pub fn quality_level(&self) -> QualityLevel {
        QualityLevel::from_score(self.score)
    }
}
