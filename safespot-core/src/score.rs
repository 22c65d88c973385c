//! Derived, never persisted, scoring outputs.

use std::fmt;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Clamp a value to `[0, 100]`. `NaN` passes through unchanged.
#[must_use]
pub const fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Clamp a value to `[0, 1]`. `NaN` passes through unchanged.
#[must_use]
pub const fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Coarse bucket derived from a final 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SafetyTier {
    /// Score of at least 70.
    Safe,
    /// Score of at least 40.
    Moderate,
    /// Anything lower, including `NaN`.
    Unsafe,
}

impl SafetyTier {
    /// Lower bound of [`SafetyTier::Safe`].
    pub const SAFE_THRESHOLD: f64 = 70.0;
    /// Lower bound of [`SafetyTier::Moderate`].
    pub const MODERATE_THRESHOLD: f64 = 40.0;

    /// Bucket a score; lower bounds are inclusive.
    ///
    /// # Examples
    /// ```
    /// use safespot_core::SafetyTier;
    ///
    /// assert_eq!(SafetyTier::from_score(70.0), SafetyTier::Safe);
    /// assert_eq!(SafetyTier::from_score(69.9), SafetyTier::Moderate);
    /// assert_eq!(SafetyTier::from_score(39.9), SafetyTier::Unsafe);
    /// ```
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= Self::SAFE_THRESHOLD {
            Self::Safe
        } else if score >= Self::MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Unsafe
        }
    }

    /// Label as shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Unsafe => "Unsafe",
        }
    }

    /// Hex colour for map markers and badges.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Safe => "#10b981",
            Self::Moderate => "#f59e0b",
            Self::Unsafe => "#ef4444",
        }
    }
}

impl fmt::Display for SafetyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full result of scoring one place.
///
/// `place_elo` is always `round(1000 + 1400 * attribute_score)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputedScore {
    /// Weighted combination on `[0, 1]`.
    pub attribute_score: f64,
    /// Display rating on `[1000, 2400]`.
    pub place_elo: f64,
    /// `attribute_score` on `[0, 100]` with one decimal.
    pub final_safety_score: f64,
    /// Bucket of `final_safety_score`.
    pub safety_tier: SafetyTier,
    /// Attribute safety sub-score, rounded.
    pub safety_score: f64,
    /// Popularity sub-score, rounded.
    pub popularity_score: f64,
    /// Experience sub-score, rounded.
    pub experience_score: f64,
    /// Trend sub-score, rounded.
    pub trend_score: f64,
    /// Confidence on `[0, 1]`.
    pub confidence_level: f64,
    /// When the score was produced.
    pub generated_at: DateTime<Utc>,
}

impl ComputedScore {
    /// Compare every field except the generation timestamp.
    #[must_use]
    pub fn same_result(&self, other: &Self) -> bool {
        Self {
            generated_at: other.generated_at,
            ..self.clone()
        } == *other
    }
}

/// Result of decaying a score by the age of its data.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecayAdjustment {
    /// Decayed score with one decimal.
    pub adjusted_score: f64,
    /// Multiplier applied, with two decimals.
    pub decay_factor: f64,
}

/// A composite score with its time-decayed counterpart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeAdjustedScore {
    /// Undecayed result.
    pub score: ComputedScore,
    /// Decay applied to `score.final_safety_score`.
    pub decay: DecayAdjustment,
}

/// Direction of movement between the two latest periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrendDirection {
    /// Score rose.
    Improving,
    /// Score fell.
    Declining,
    /// Change below five percent.
    Stable,
}

impl TrendDirection {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend derived from a place's history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrendAnalysis {
    /// Most recent score.
    pub current_score: f64,
    /// Score of the period before.
    pub previous_score: f64,
    /// `current - previous`, one decimal.
    pub change: f64,
    /// Change relative to `previous`, one decimal; zero when `previous` is zero.
    pub change_percentage: f64,
    /// Direction of the change.
    pub direction: TrendDirection,
    /// Change per month, two decimals.
    pub velocity: f64,
    /// Linear forecast thirty days ahead on `[0, 100]`.
    pub prediction_30_days: f64,
    /// Stability of recent scores on `[0, 1]`.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, SafetyTier::Safe)]
    #[case(70.0, SafetyTier::Safe)]
    #[case(69.9, SafetyTier::Moderate)]
    #[case(40.0, SafetyTier::Moderate)]
    #[case(39.9, SafetyTier::Unsafe)]
    #[case(0.0, SafetyTier::Unsafe)]
    #[case(f64::NAN, SafetyTier::Unsafe)]
    fn buckets_scores(#[case] score: f64, #[case] tier: SafetyTier) {
        assert_eq!(SafetyTier::from_score(score), tier);
    }

    #[rstest]
    #[case(-3.0, 0.0)]
    #[case(42.5, 42.5)]
    #[case(120.0, 100.0)]
    fn clamps_percentages(#[case] input: f64, #[case] expected: f64) {
        assert!((clamp_percent(input) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn clamping_keeps_nan() {
        assert!(clamp_percent(f64::NAN).is_nan());
        assert!(clamp_unit(f64::NAN).is_nan());
    }

    #[test]
    fn tiers_have_distinct_colours() {
        assert_ne!(SafetyTier::Safe.colour(), SafetyTier::Moderate.colour());
        assert_ne!(SafetyTier::Moderate.colour(), SafetyTier::Unsafe.colour());
    }
}
