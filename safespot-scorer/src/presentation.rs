//! Display lookups for scores and trends.

use safespot_core::{SafetyTier, TRENDING_THRESHOLD};
use serde::Serialize;

/// Trend score below which a place is shown as declining.
const DECLINING_THRESHOLD: f64 = 35.0;

/// Gradient class string for a 0–100 score, banded like [`SafetyTier`].
#[must_use]
pub fn gradient_for(score: f64) -> &'static str {
    match SafetyTier::from_score(score) {
        SafetyTier::Safe => "from-green-400 to-emerald-600",
        SafetyTier::Moderate => "from-yellow-400 to-orange-500",
        SafetyTier::Unsafe => "from-red-400 to-rose-600",
    }
}

/// Label, arrow and text colour describing a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendIndicator {
    /// `Improving`, `Declining` or `Neutral`.
    pub text: &'static str,
    /// Arrow glyph.
    pub icon: &'static str,
    /// Text colour class.
    pub colour: &'static str,
}

/// Indicator for a canonical 0–100 trend score.
///
/// Scores above 65 improve and below 35 decline; both bounds are the raw
/// ±0.3 thresholds on the canonical scale.
///
/// # Examples
/// ```
/// use safespot_scorer::trend_indicator;
///
/// assert_eq!(trend_indicator(80.0).text, "Improving");
/// assert_eq!(trend_indicator(50.0).icon, "→");
/// assert_eq!(trend_indicator(10.0).colour, "text-red-600");
/// ```
#[must_use]
pub fn trend_indicator(trend_score: f64) -> TrendIndicator {
    if trend_score > TRENDING_THRESHOLD {
        TrendIndicator {
            text: "Improving",
            icon: "↗",
            colour: "text-green-600",
        }
    } else if trend_score < DECLINING_THRESHOLD {
        TrendIndicator {
            text: "Declining",
            icon: "↘",
            colour: "text-red-600",
        }
    } else {
        TrendIndicator {
            text: "Neutral",
            icon: "→",
            colour: "text-gray-600",
        }
    }
}
