//! Aggregates over usage series.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ColorKey;
use crate::error::{CatalogHealthError, Result};

/// Arithmetic mean of `values`.
///
/// An empty slice is an error rather than `NaN`.
pub fn average(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(CatalogHealthError::EmptyDataSet {
            context: "average".to_string(),
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of `values`, or `0.0` when there are none.
pub fn average_or_default(values: &[f64]) -> f64 {
    average(values).unwrap_or_default()
}

/// Usage intensity bucket for an average usage figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    /// Below 30.
    Low,
    /// 30 to below 60.
    Medium,
    /// 60 to below 80.
    High,
    /// 80 and above.
    VeryHigh,
}

impl UsageLevel {
    /// Lower bound of [`UsageLevel::Medium`].
    pub const MEDIUM_THRESHOLD: f64 = 30.0;
    /// Lower bound of [`UsageLevel::High`].
    pub const HIGH_THRESHOLD: f64 = 60.0;
    /// Lower bound of [`UsageLevel::VeryHigh`].
    pub const VERY_HIGH_THRESHOLD: f64 = 80.0;

    /// Bucket an average.
    pub fn from_average(average: f64) -> Self {
        if average >= Self::VERY_HIGH_THRESHOLD {
            Self::VeryHigh
        } else if average >= Self::HIGH_THRESHOLD {
            Self::High
        } else if average >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Color bucket for the level.
    pub fn color(self) -> ColorKey {
        match self {
            Self::Low => ColorKey::Red,
            Self::Medium => ColorKey::Orange,
            Self::High => ColorKey::Green,
            Self::VeryHigh => ColorKey::LightGreen,
        }
    }
}

/// Usage level of a series; empty series are [`UsageLevel::Low`].
pub fn usage_level(values: &[f64]) -> UsageLevel {
    UsageLevel::from_average(average_or_default(values))
}

#[cfg(test)]
mod tests {
    use super::{UsageLevel, average, average_or_default, usage_level};
    use crate::domain::ColorKey;
    use crate::error::CatalogHealthError;

    #[test]
    fn averages_values() {
        assert_eq!(average(&[10.0, 20.0, 30.0]), Ok(20.0));
        assert_eq!(average(&[7.5]), Ok(7.5));
    }

    #[test]
    fn empty_average_is_an_error() {
        assert!(matches!(
            average(&[]),
            Err(CatalogHealthError::EmptyDataSet { .. })
        ));
        assert_eq!(average_or_default(&[]), 0.0);
    }

    #[test]
    fn usage_levels_follow_thresholds() {
        assert_eq!(UsageLevel::from_average(29.9), UsageLevel::Low);
        assert_eq!(UsageLevel::from_average(30.0), UsageLevel::Medium);
        assert_eq!(UsageLevel::from_average(60.0), UsageLevel::High);
        assert_eq!(UsageLevel::from_average(80.0), UsageLevel::VeryHigh);
        assert_eq!(usage_level(&[]), UsageLevel::Low);
        assert_eq!(usage_level(&[70.0, 90.0]), UsageLevel::VeryHigh);
        assert_eq!(UsageLevel::Low.color(), ColorKey::Red);
        assert_eq!(UsageLevel::VeryHigh.color(), ColorKey::LightGreen);
    }
}
