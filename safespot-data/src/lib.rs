//! Ingestion boundary for the SafeSpot engine.
//!
//! Responsibilities:
//! - Read fixture files in the canonical or the flat legacy shape.
//! - Translate legacy places into canonical records, normalising trends once.
//! - Persist canonical records to the SQLite artefact read by
//!   `safespot_core::SqlitePlaceStore`.
//! - Append validated user reviews to that artefact.
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `safespot-scorer`).
//! - Filesystem access goes through capability-based helpers in [`fs`].
//!
//! Invariants:
//! - Records leaving this crate have coordinates within WGS84 bounds.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod fixture;
pub mod fs;
pub mod legacy;
pub mod sqlite;

pub use fixture::{FixtureError, FixtureFormat, load_fixture, parse_fixture};
pub use legacy::{
    LEGACY_SOURCE, LegacyCrime, LegacyFixture, LegacyInfra, LegacyPlace, LegacyReview,
};
pub use sqlite::{
    AppendReviewError, IngestSummary, PersistPlacesError, append_review_to_sqlite,
    persist_records_to_sqlite,
};
