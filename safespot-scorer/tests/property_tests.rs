//! Property-based tests for the scoring engine.
//!
//! # Invariants tested
//!
//! - **Bounded safety:** attribute scores stay within `[0, 100]`.
//! - **Rating identity:** `place_elo == round(1000 + 1400 * attribute_score)`.
//! - **Tier consistency:** the tier always matches the final score.
//! - **Distance symmetry:** haversine distance is reflexive and symmetric.
//! - **Monotonic decay:** older data never decays less than newer data.
//! - **Smoothing shape:** smoothing preserves length and stays within range.

use chrono::Duration;
use geo::Coord;
use proptest::prelude::*;
use safespot_core::{
    Place, SafetyAttributes, SafetyTier, distance_km,
    test_support::{sample_attributes, stamp},
};
use safespot_scorer::{
    DEFAULT_DECAY_CONSTANT, apply_decay, composite_score, exponential_smoothing,
    safety_from_attributes,
};

fn attributes_strategy() -> impl Strategy<Value = SafetyAttributes> {
    (
        prop::array::uniform3(0.0..=100.0_f64),
        prop::array::uniform3(0.0..=100.0_f64),
    )
        .prop_map(|([violent, property, accident], [cctv, lighting, police])| {
            SafetyAttributes {
                violent_crime: violent,
                property_crime: property,
                accident_rate: accident,
                cctv_coverage: cctv,
                lighting_score: lighting,
                police_density: police,
                ..sample_attributes("p", stamp())
            }
        })
}

fn place_strategy() -> impl Strategy<Value = Place> {
    prop::array::uniform3(0.0..=100.0_f64).prop_map(|[popularity, experience, trend]| {
        Place::new("p", "Generated", Coord { x: 0.0, y: 0.0 }).with_signals(
            popularity, experience, trend,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn safety_is_bounded(attrs in attributes_strategy()) {
        let score = safety_from_attributes(&attrs);
        prop_assert!((0.0..=100.0).contains(&score), "score {score} out of range");
    }

    #[test]
    #[expect(clippy::float_arithmetic, reason = "checks the rating identity")]
    fn rating_follows_attribute_score(
        attrs in attributes_strategy(),
        place in place_strategy(),
    ) {
        let score = composite_score(&place, &attrs, None, stamp());
        prop_assert!((0.0..=1.0).contains(&score.attribute_score));
        prop_assert_eq!(score.place_elo, (1000.0 + 1400.0 * score.attribute_score).round());
        prop_assert!((1000.0..=2400.0).contains(&score.place_elo));
        prop_assert_eq!(score.safety_tier, SafetyTier::from_score(score.final_safety_score));
        prop_assert!((0.0..=1.0).contains(&score.confidence_level));
    }

    #[test]
    #[expect(clippy::float_arithmetic, reason = "compares distances within tolerance")]
    fn distance_is_reflexive_and_symmetric(
        lat1 in -90.0..=90.0_f64,
        lng1 in -180.0..=180.0_f64,
        lat2 in -90.0..=90.0_f64,
        lng2 in -180.0..=180.0_f64,
    ) {
        prop_assert!(distance_km(lat1, lng1, lat1, lng1).abs() < 1e-9);
        let there = distance_km(lat1, lng1, lat2, lng2);
        let back = distance_km(lat2, lng2, lat1, lng1);
        prop_assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn decay_never_increases_with_age(
        younger in 0_i64..3650,
        extra in 1_i64..3650,
    ) {
        let now = stamp();
        let fresh = apply_decay(100.0, now - Duration::days(younger), DEFAULT_DECAY_CONSTANT, now);
        let stale = apply_decay(
            100.0,
            now - Duration::days(younger + extra),
            DEFAULT_DECAY_CONSTANT,
            now,
        );
        prop_assert!(stale.adjusted_score <= fresh.adjusted_score);
        prop_assert!(stale.decay_factor <= fresh.decay_factor);
        prop_assert!(fresh.decay_factor <= 1.0);
    }

    #[test]
    fn smoothing_stays_within_series_range(
        series in prop::collection::vec(0.0..=100.0_f64, 0..20),
        alpha in 0.0..=1.0_f64,
    ) {
        let smoothed = exponential_smoothing(&series, alpha);
        prop_assert_eq!(smoothed.len(), series.len());
        let min = series.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for value in smoothed {
            prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
        }
    }
}
