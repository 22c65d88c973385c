//! Facade crate for the SafeSpot safety scoring engine.
//!
//! This crate re-exports the core domain types and the scorer, and exposes
//! the SQLite store and fixture ingestion behind feature flags.

#![forbid(unsafe_code)]

pub use safespot_core::{
    ComputedScore, DecayAdjustment, MemoryStore, Place, PlaceError, PlaceId, PlaceQuery,
    PlaceRecord, PlaceStore, RankedPlace, Review, ReviewError, SafetyAttributes, SafetyContext,
    SafetyHistory, SafetyScorer, SafetyTier, SortField, SortOrder, TimeAdjustedScore, TimeOfDay,
    TrendAnalysis, TrendDirection, distance_km, query_places, search_by_name,
};

pub use safespot_scorer::{
    CompositeScorer, ContextScores, PlaceReport, ReportOptions, ReviewStats, analyze_trend,
    build_report, composite_score, context_score, time_adjusted_score,
};

#[cfg(feature = "store-sqlite")]
pub use safespot_core::{SqlitePlaceStore, SqlitePlaceStoreError};

#[cfg(feature = "ingest")]
pub use safespot_data::{
    AppendReviewError, FixtureError, FixtureFormat, IngestSummary, PersistPlacesError,
    append_review_to_sqlite, load_fixture, persist_records_to_sqlite,
};
