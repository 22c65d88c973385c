//! Exponential time decay.

use chrono::{DateTime, Utc};
use safespot_core::{DecayAdjustment, Place, Review, SafetyAttributes, TimeAdjustedScore};

use crate::{composite_score, round_to};

/// Decay constant λ applied per month when callers supply none.
pub const DEFAULT_DECAY_CONSTANT: f64 = 0.15;

const SECONDS_PER_MONTH: f64 = 30.0 * 24.0 * 60.0 * 60.0;

/// `e^(-λ·months)`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "exponent of the decay curve")]
pub fn decay_factor(months: f64, decay_constant: f64) -> f64 {
    (-decay_constant * months).exp()
}

/// Decay `score` by the age of `timestamp` relative to `now`.
///
/// A month is thirty days. Timestamps in the future count as zero elapsed
/// time. The adjusted score has one decimal and the reported factor two;
/// the score is computed from the unrounded factor. There is no floor.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use safespot_scorer::{DEFAULT_DECAY_CONSTANT, apply_decay};
///
/// let now = Utc::now();
/// let fresh = apply_decay(80.0, now, DEFAULT_DECAY_CONSTANT, now);
/// assert_eq!(fresh.decay_factor, 1.0);
/// assert_eq!(fresh.adjusted_score, 80.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "decayed score")]
#[expect(
    clippy::cast_precision_loss,
    reason = "elapsed seconds stay well inside f64 precision"
)]
pub fn apply_decay(
    score: f64,
    timestamp: DateTime<Utc>,
    decay_constant: f64,
    now: DateTime<Utc>,
) -> DecayAdjustment {
    let elapsed = (now - timestamp).num_seconds().max(0);
    let months = elapsed as f64 / SECONDS_PER_MONTH;
    let factor = decay_factor(months, decay_constant);
    DecayAdjustment {
        adjusted_score: round_to(score * factor, 1),
        decay_factor: round_to(factor, 2),
    }
}

/// Composite score with its final value decayed by the snapshot's age.
///
/// Snapshots without a timestamp are treated as current.
#[must_use]
pub fn time_adjusted_score(
    place: &Place,
    attrs: &SafetyAttributes,
    reviews: Option<&[Review]>,
    decay_constant: f64,
    now: DateTime<Utc>,
) -> TimeAdjustedScore {
    let score = composite_score(place, attrs, reviews, now);
    let decay = apply_decay(
        score.final_safety_score,
        attrs.data_timestamp.unwrap_or(now),
        decay_constant,
        now,
    );
    TimeAdjustedScore { score, decay }
}
