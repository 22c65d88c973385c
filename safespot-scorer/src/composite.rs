//! Composite score engine.

use chrono::{DateTime, Duration, Utc};
use safespot_core::{
    ComputedScore, Place, PlaceId, Review, SafetyAttributes, SafetyScorer, SafetyTier,
    clamp_percent, clamp_unit,
};

use crate::{round_to, safety_from_attributes};

const SAFETY_WEIGHT: f64 = 0.4;
const POPULARITY_WEIGHT: f64 = 0.3;
const EXPERIENCE_WEIGHT: f64 = 0.2;
const TREND_WEIGHT: f64 = 0.1;

const ELO_BASE: f64 = 1000.0;
const ELO_SPAN: f64 = 1400.0;

const DEFAULT_CONFIDENCE: f64 = 0.5;
const RECENT_REVIEW_DAYS: i64 = 30;
const REVIEW_BOOST_STEP: f64 = 0.05;
const REVIEW_BOOST_CAP: f64 = 0.3;
const STALE_DATA_DAYS: i64 = 90;
const STALE_DATA_FACTOR: f64 = 0.7;

/// Score a place.
///
/// The safety sub-score comes from [`safety_from_attributes`]; popularity,
/// experience and the canonical 0–100 trend score are read from `place`
/// and clamped. The attribute score is their weighted blend
/// (`0.4, 0.3, 0.2, 0.1`) on `[0, 1]`, `place_elo` is
/// `round(1000 + 1400 * attribute_score)` and the final score is the
/// attribute score as a percentage with one decimal. `now` anchors the
/// confidence calculation and becomes `generated_at`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted blend of sub-scores")]
pub fn composite_score(
    place: &Place,
    attrs: &SafetyAttributes,
    reviews: Option<&[Review]>,
    now: DateTime<Utc>,
) -> ComputedScore {
    let safety = safety_from_attributes(attrs);
    let popularity = clamp_percent(place.popularity_score);
    let experience = clamp_percent(place.experience_score);
    let trend = clamp_percent(place.trend_score);

    let attribute_score = clamp_unit(
        SAFETY_WEIGHT * safety / 100.0
            + POPULARITY_WEIGHT * popularity / 100.0
            + EXPERIENCE_WEIGHT * experience / 100.0
            + TREND_WEIGHT * trend / 100.0,
    );
    let final_safety_score = round_to(attribute_score * 100.0, 1);

    ComputedScore {
        attribute_score,
        place_elo: (ELO_BASE + ELO_SPAN * attribute_score).round(),
        final_safety_score,
        safety_tier: SafetyTier::from_score(final_safety_score),
        safety_score: safety.round(),
        popularity_score: popularity.round(),
        experience_score: experience.round(),
        trend_score: trend.round(),
        confidence_level: confidence_level(attrs, reviews, now),
        generated_at: now,
    }
}

/// Confidence in a score on `[0, 1]`.
///
/// Starts from the snapshot's confidence (0.5 when absent), gains 0.05 per
/// review from the last 30 days up to 0.3, and is scaled by 0.7 when the
/// snapshot is more than 90 days old.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "confidence adjustments")]
#[expect(
    clippy::cast_precision_loss,
    reason = "review counts are far below f64 precision"
)]
pub fn confidence_level(
    attrs: &SafetyAttributes,
    reviews: Option<&[Review]>,
    now: DateTime<Utc>,
) -> f64 {
    let mut confidence = attrs.confidence_score.unwrap_or(DEFAULT_CONFIDENCE);

    if let Some(reviews) = reviews {
        let recent_cutoff = now - Duration::days(RECENT_REVIEW_DAYS);
        let recent = reviews
            .iter()
            .filter(|r| r.created_at >= recent_cutoff)
            .count();
        confidence += (recent as f64 * REVIEW_BOOST_STEP).min(REVIEW_BOOST_CAP);
    }

    let stale_cutoff = now - Duration::days(STALE_DATA_DAYS);
    if attrs.data_timestamp.is_some_and(|t| t < stale_cutoff) {
        confidence *= STALE_DATA_FACTOR;
    }

    clamp_unit(confidence)
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

/// [`SafetyScorer`] backed by [`composite_score`].
///
/// The default scorer reads the system clock on every call; [`Self::at`]
/// pins "now" for reproducible results.
#[derive(Debug, Clone, Copy)]
pub struct CompositeScorer {
    clock: Clock,
}

impl CompositeScorer {
    /// Scorer using the system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: Clock::System,
        }
    }

    /// Scorer that always treats `now` as the current time.
    #[must_use]
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            clock: Clock::Fixed(now),
        }
    }

    fn now(self) -> DateTime<Utc> {
        match self.clock {
            Clock::System => Utc::now(),
            Clock::Fixed(now) => now,
        }
    }
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyScorer for CompositeScorer {
    fn score(
        &self,
        place: &Place,
        attributes: &SafetyAttributes,
        reviews: Option<&[Review]>,
    ) -> ComputedScore {
        composite_score(place, attributes, reviews, self.now())
    }
}

/// Score many places with one scorer.
///
/// Entries are independent, so callers holding many places may equally
/// split them across threads; results keep input order.
pub fn score_batch<'a, S, I>(scorer: &S, entries: I) -> Vec<(PlaceId, ComputedScore)>
where
    S: SafetyScorer + ?Sized,
    I: IntoIterator<Item = (&'a Place, &'a SafetyAttributes, Option<&'a [Review]>)>,
{
    entries
        .into_iter()
        .map(|(place, attrs, reviews)| (place.id.clone(), scorer.score(place, attrs, reviews)))
        .collect()
}
