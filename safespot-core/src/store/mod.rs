//! Data access traits for places and their related records.
//!
//! The [`PlaceStore`] trait is the capability seam between the scoring core
//! and whatever supplies its data. Two implementations ship with the crate:
//! [`MemoryStore`] for fixtures and tests, and `SqlitePlaceStore` behind the
//! `store-sqlite` feature. Callers pick one at composition time.

use crate::{Place, PlaceId, PlaceQuery, Review, SafetyAttributes, SafetyHistory};

mod memory;
#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use schema::{create_schema, insert_record, insert_review};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlaceStore, SqlitePlaceStoreError};

/// Read-only access to a loaded snapshot of places.
///
/// Reads are infallible: implementations load and validate their data up
/// front and report failures when they are constructed.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use geo::Coord;
/// use safespot_core::{MemoryStore, Place, PlaceQuery, PlaceStore, Review};
///
/// let place = Place::new("p1", "Marina Beach", Coord { x: 80.28, y: 13.05 });
/// let store = MemoryStore::default()
///     .with_place(place.clone())
///     .with_review(Review::new("r1", "p1", 4, Utc::now()));
///
/// let found: Vec<_> = store.fetch_places(&PlaceQuery::default()).collect();
/// assert_eq!(found, vec![place]);
/// assert_eq!(store.fetch_reviews(&"p1".into(), 10).len(), 1);
/// ```
pub trait PlaceStore {
    /// Candidate places for `query`.
    ///
    /// Implementations may narrow the candidates with the query's bounding
    /// box but must never drop a place the exact filters would keep. Apply
    /// [`crate::query_places`] to the result for the final answer.
    fn fetch_places(&self, query: &PlaceQuery) -> Box<dyn Iterator<Item = Place> + Send + '_>;

    /// Latest attribute snapshot for a place.
    fn fetch_attributes(&self, id: &PlaceId) -> Option<SafetyAttributes>;

    /// At most `limit` reviews for a place, newest first.
    fn fetch_reviews(&self, id: &PlaceId, limit: usize) -> Vec<Review>;

    /// Monthly history for a place in any order.
    fn fetch_history(&self, id: &PlaceId) -> Vec<SafetyHistory>;

    /// Look a place up by identifier.
    fn find_place(&self, id: &PlaceId) -> Option<Place> {
        let all = PlaceQuery {
            limit: usize::MAX,
            ..PlaceQuery::default()
        };
        self.fetch_places(&all).find(|place| &place.id == id)
    }
}

/// Clone up to `limit` reviews ordered from newest to oldest.
fn newest_first(reviews: &[Review], limit: usize) -> Vec<Review> {
    let mut sorted = reviews.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(2, 2)]
    #[case(10, 3)]
    fn newest_first_orders_and_limits(#[case] limit: usize, #[case] expected: usize) {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date");
        let reviews = vec![
            Review::new("old", "p", 3, base),
            Review::new("new", "p", 4, base + Duration::days(2)),
            Review::new("mid", "p", 5, base + Duration::days(1)),
        ];
        let picked = newest_first(&reviews, limit);
        assert_eq!(picked.len(), expected);
        let ids: Vec<_> = picked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old"][..expected].to_vec());
    }
}
