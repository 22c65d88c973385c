//! Core domain types for the SafeSpot scoring engine.
//!
//! The crate models places, their raw safety signals, user reviews and
//! monthly history snapshots, together with the output types produced by the
//! scorer. It also owns the pure geographic helpers and the query/ranking
//! engine used to filter, sort and paginate place collections, plus the
//! [`PlaceStore`] seam through which data sources supply those collections.
//!
//! Scoring itself lives in the `safespot-scorer` crate and plugs into callers
//! through the [`SafetyScorer`] trait defined here.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attributes;
pub mod context;
pub mod distance;
pub mod history;
pub mod place;
pub mod query;
pub mod review;
pub mod score;
pub mod scorer;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use attributes::SafetyAttributes;
pub use context::SafetyContext;
pub use distance::{EARTH_RADIUS_KM, bounding_box, distance_between, distance_km, round_distance};
pub use history::SafetyHistory;
pub use place::{
    NEUTRAL_TREND_SCORE, Place, PlaceError, PlaceId, PlaceRecord, RAW_TRENDING_THRESHOLD,
    TRENDING_THRESHOLD, normalise_trend,
};
pub use query::{PlaceQuery, RankedPlace, SortField, SortOrder, query_places, search_by_name};
pub use review::{RATING_RANGE, Review, ReviewError, TimeOfDay};
pub use score::{
    ComputedScore, DecayAdjustment, SafetyTier, TimeAdjustedScore, TrendAnalysis, TrendDirection,
    clamp_percent, clamp_unit,
};
pub use scorer::SafetyScorer;
pub use store::{MemoryStore, PlaceStore};

#[cfg(feature = "store-sqlite")]
pub use store::{
    SqlitePlaceStore, SqlitePlaceStoreError, create_schema, insert_record, insert_review,
};
