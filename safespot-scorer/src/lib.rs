//! Scoring engine for SafeSpot places.
//!
//! The crate turns the raw signals modelled in [`safespot_core`] into the
//! derived scores served to users:
//! - **Attribute scoring** combines crime and infrastructure signals into a
//!   0–100 safety sub-score. Every external data shape is translated into
//!   [`SafetySignals`] first, so there is exactly one formula.
//! - **Context scoring** weights the same signals for night travel, women,
//!   tourists and crowds, layering review evidence where it exists.
//! - **Composite scoring** blends safety, popularity, experience and trend
//!   into an attribute score, an Elo-style rating, a tier and a confidence
//!   level. [`CompositeScorer`] implements
//!   [`SafetyScorer`](safespot_core::SafetyScorer).
//! - **Time decay** and **trend analysis** describe how scores age and move.
//! - **Reports** assemble all of the above for a single place from any
//!   [`PlaceStore`](safespot_core::PlaceStore).
//!
//! All functions are pure and deterministic given their inputs and an
//! explicit "now"; none of them fail.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use geo::Coord;
//! use safespot_core::{Place, SafetyAttributes, SafetyTier};
//! use safespot_scorer::composite_score;
//!
//! let now = Utc::now();
//! let place = Place::new("p1", "Marina Beach", Coord { x: 80.28, y: 13.05 })
//!     .with_signals(90.0, 70.0, 70.0);
//! let attrs = SafetyAttributes::neutral(place.id.clone(), now);
//!
//! let score = composite_score(&place, &attrs, None, now);
//! assert_eq!(score.safety_tier, SafetyTier::Safe);
//! assert_eq!(score.place_elo, (1000.0 + 1400.0 * score.attribute_score).round());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attributes;
mod composite;
mod context;
mod decay;
mod presentation;
mod report;
mod reviews;
mod trend;

pub use attributes::{SafetySignals, safety_from_attributes, safety_from_signals};
pub use composite::{CompositeScorer, composite_score, confidence_level, score_batch};
pub use context::{
    ContextScores, WOMEN_CONCERN_TAGS, context_profile, context_score, night_safety_score,
    tourist_safety_score, women_safety_score,
};
pub use decay::{DEFAULT_DECAY_CONSTANT, apply_decay, decay_factor, time_adjusted_score};
pub use presentation::{TrendIndicator, gradient_for, trend_indicator};
pub use report::{PlaceReport, ReportOptions, build_report};
pub use reviews::{ReviewStats, review_stats};
pub use trend::{DEFAULT_SMOOTHING_ALPHA, analyze_trend, exponential_smoothing};

/// Round `value` to `decimals` places, half away from zero.
#[expect(
    clippy::float_arithmetic,
    reason = "decimal rounding scales, rounds and rescales"
)]
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
