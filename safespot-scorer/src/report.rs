//! Per-place report assembled from a [`PlaceStore`].

use chrono::{DateTime, Utc};
use safespot_core::{
    Place, PlaceId, PlaceStore, Review, SafetyAttributes, TimeAdjustedScore, TrendAnalysis,
};
use serde::Serialize;

use crate::{
    ContextScores, DEFAULT_DECAY_CONSTANT, ReviewStats, TrendIndicator, analyze_trend,
    context_profile, gradient_for, review_stats, time_adjusted_score, trend_indicator,
};

/// Tunables for [`build_report`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    /// Decay constant λ per thirty-day month.
    pub decay_constant: f64,
    /// Maximum number of reviews fetched, newest first.
    pub review_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            decay_constant: DEFAULT_DECAY_CONSTANT,
            review_limit: 10,
        }
    }
}

/// Everything known about one place, scored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReport {
    /// The place as stored.
    pub place: Place,
    /// Whether neutral attributes stood in for a missing snapshot.
    pub attributes_defaulted: bool,
    /// Composite score and its decayed value.
    pub score: TimeAdjustedScore,
    /// Score for every context.
    pub contexts: ContextScores,
    /// Trend over the stored history, when there are two or more periods.
    pub trend: Option<TrendAnalysis>,
    /// Summary of the fetched reviews.
    pub review_stats: ReviewStats,
    /// Fetched reviews, newest first.
    pub reviews: Vec<Review>,
    /// Hex colour of the score's tier.
    pub tier_colour: &'static str,
    /// Gradient class for the final score.
    pub gradient: &'static str,
    /// Indicator for the stored trend score.
    pub trend_indicator: TrendIndicator,
}

/// Fetch and score everything about `id`.
///
/// Returns `None` when the store has no such place. A missing attribute
/// snapshot is replaced by [`SafetyAttributes::neutral`] and flagged.
pub fn build_report<S>(
    store: &S,
    id: &PlaceId,
    options: &ReportOptions,
    now: DateTime<Utc>,
) -> Option<PlaceReport>
where
    S: PlaceStore + ?Sized,
{
    let place = store.find_place(id)?;
    let stored = store.fetch_attributes(id);
    let attributes_defaulted = stored.is_none();
    let attributes = stored.unwrap_or_else(|| {
        log::warn!("no safety attributes for place {id}; using neutral defaults");
        SafetyAttributes::neutral(id.clone(), now)
    });
    let reviews = store.fetch_reviews(id, options.review_limit);
    let history = store.fetch_history(id);

    let score = time_adjusted_score(
        &place,
        &attributes,
        Some(&reviews),
        options.decay_constant,
        now,
    );

    Some(PlaceReport {
        attributes_defaulted,
        contexts: context_profile(&attributes, Some(&reviews)),
        trend: analyze_trend(&history),
        review_stats: review_stats(&reviews, now),
        tier_colour: score.score.safety_tier.colour(),
        gradient: gradient_for(score.score.final_safety_score),
        trend_indicator: trend_indicator(place.trend_score),
        score,
        reviews,
        place,
    })
}
