//! Pluggable scoring seam.

use crate::{ComputedScore, Place, Review, SafetyAttributes};

/// Computes a [`ComputedScore`] for a place.
///
/// Implementations are pure with respect to their inputs and may be shared
/// across threads, so callers are free to score places in parallel.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use geo::Coord;
/// use safespot_core::{ComputedScore, Place, Review, SafetyAttributes, SafetyScorer, SafetyTier};
///
/// struct Flat;
///
/// impl SafetyScorer for Flat {
///     fn score(
///         &self,
///         _place: &Place,
///         _attributes: &SafetyAttributes,
///         _reviews: Option<&[Review]>,
///     ) -> ComputedScore {
///         ComputedScore {
///             attribute_score: 0.5,
///             place_elo: 1700.0,
///             final_safety_score: 50.0,
///             safety_tier: SafetyTier::Moderate,
///             safety_score: 50.0,
///             popularity_score: 50.0,
///             experience_score: 50.0,
///             trend_score: 50.0,
///             confidence_level: 0.5,
///             generated_at: Utc::now(),
///         }
///     }
/// }
///
/// let place = Place::new("p", "Plaza", Coord { x: 0.0, y: 0.0 });
/// let attrs = SafetyAttributes::neutral(place.id.clone(), Utc::now());
/// assert_eq!(Flat.score(&place, &attrs, None).place_elo, 1700.0);
/// ```
pub trait SafetyScorer: Send + Sync {
    /// Score `place` from its attributes and, when supplied, its reviews.
    fn score(
        &self,
        place: &Place,
        attributes: &SafetyAttributes,
        reviews: Option<&[Review]>,
    ) -> ComputedScore;
}
