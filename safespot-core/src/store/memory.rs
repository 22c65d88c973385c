//! In-memory `PlaceStore` used for fixtures and tests.

use std::collections::HashMap;

use geo::Intersects;

use crate::{
    Place, PlaceId, PlaceQuery, PlaceRecord, Review, SafetyAttributes, SafetyHistory,
    distance::bounding_box,
};

use super::{PlaceStore, newest_first};

/// In-memory [`PlaceStore`].
///
/// The store performs a linear scan and is intended for small datasets such
/// as JSON fixtures. Places keep their insertion order.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    places: Vec<Place>,
    attributes: HashMap<PlaceId, SafetyAttributes>,
    reviews: HashMap<PlaceId, Vec<Review>>,
    history: HashMap<PlaceId, Vec<SafetyHistory>>,
}

impl MemoryStore {
    /// Build a store from full records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PlaceRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |store, record| store.with_record(record))
    }

    /// Add a place while returning `self` for chaining.
    #[must_use]
    pub fn with_place(mut self, place: Place) -> Self {
        self.places.push(place);
        self
    }

    /// Add a place with its related data.
    #[must_use]
    pub fn with_record(mut self, record: PlaceRecord) -> Self {
        let PlaceRecord {
            place,
            attributes,
            reviews,
            history,
        } = record;
        if let Some(attributes) = attributes {
            self.attributes.insert(place.id.clone(), attributes);
        }
        for review in reviews {
            self = self.with_review(review);
        }
        for entry in history {
            self = self.with_history(entry);
        }
        self.with_place(place)
    }

    /// Replace the attribute snapshot of `attributes.place_id`.
    #[must_use]
    pub fn with_attributes(mut self, attributes: SafetyAttributes) -> Self {
        self.attributes
            .insert(attributes.place_id.clone(), attributes);
        self
    }

    /// Add a review for `review.place_id`.
    #[must_use]
    pub fn with_review(mut self, review: Review) -> Self {
        self.reviews
            .entry(review.place_id.clone())
            .or_default()
            .push(review);
        self
    }

    /// Add a history entry for `entry.place_id`.
    #[must_use]
    pub fn with_history(mut self, entry: SafetyHistory) -> Self {
        self.history
            .entry(entry.place_id.clone())
            .or_default()
            .push(entry);
        self
    }

    /// Every stored place in insertion order.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Reassemble the stored data as records, in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<PlaceRecord> {
        self.places
            .iter()
            .map(|place| PlaceRecord {
                place: place.clone(),
                attributes: self.attributes.get(&place.id).cloned(),
                reviews: self.reviews.get(&place.id).cloned().unwrap_or_default(),
                history: self.history.get(&place.id).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Number of stored places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the store holds no places.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl PlaceStore for MemoryStore {
    fn fetch_places(&self, query: &PlaceQuery) -> Box<dyn Iterator<Item = Place> + Send + '_> {
        let bbox = query
            .center()
            .zip(query.radius_km)
            .map(|(center, radius)| bounding_box(center, radius));
        Box::new(
            self.places
                .iter()
                // `Intersects` treats boundary points as inside the rectangle.
                .filter(move |p| bbox.is_none_or(|b| b.intersects(&p.location)))
                .cloned(),
        )
    }

    fn fetch_attributes(&self, id: &PlaceId) -> Option<SafetyAttributes> {
        self.attributes.get(id).cloned()
    }

    fn fetch_reviews(&self, id: &PlaceId, limit: usize) -> Vec<Review> {
        self.reviews
            .get(id)
            .map(|reviews| newest_first(reviews, limit))
            .unwrap_or_default()
    }

    fn fetch_history(&self, id: &PlaceId) -> Vec<SafetyHistory> {
        self.history.get(id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_places;
    use crate::test_support::{sample_records, stamp};
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::from_records(sample_records(stamp()))
    }

    #[rstest]
    fn returns_every_place_without_centre(store: MemoryStore) {
        assert_eq!(store.fetch_places(&PlaceQuery::default()).count(), store.len());
    }

    #[rstest]
    fn prefilters_by_bounding_box(store: MemoryStore) {
        let query = PlaceQuery::default().near(13.05, 80.28).within_km(2.0);
        let candidates: Vec<_> = store.fetch_places(&query).collect();
        assert!(!candidates.is_empty());
        assert!(candidates.len() < store.len());
        let exact = query_places(store.fetch_places(&query), &query);
        let full = query_places(store.places().to_vec(), &query);
        assert_eq!(exact, full);
    }

    #[rstest]
    fn includes_place_on_bbox_boundary() {
        let center = Coord { x: 0.0, y: 0.0 };
        let edge = bounding_box(center, 10.0).max();
        let store = MemoryStore::default().with_place(Place::new("edge", "Edge", edge));
        let query = PlaceQuery::default().near(0.0, 0.0).within_km(10.0);
        assert_eq!(store.fetch_places(&query).count(), 1);
    }

    #[rstest]
    #[case::near_radius(0.0, 0.0, 100.0, Coord { x: 0.0, y: 0.899 })]
    #[case::across_antimeridian(0.0, 179.99, 50.0, Coord { x: -179.99, y: 0.0 })]
    fn prefilter_keeps_every_place_inside_radius(
        #[case] lat: f64,
        #[case] lng: f64,
        #[case] radius_km: f64,
        #[case] location: Coord<f64>,
    ) {
        let place = Place::new("inside", "Inside", location);
        let store = MemoryStore::default().with_place(place.clone());
        let query = PlaceQuery::default().near(lat, lng).within_km(radius_km);
        let exact = query_places(vec![place], &query);
        assert_eq!(exact.len(), 1);
        assert_eq!(query_places(store.fetch_places(&query), &query), exact);
    }

    #[rstest]
    fn finds_places_by_id(store: MemoryStore) {
        let found = store.find_place(&"marina".into());
        assert_eq!(found.map(|p| p.name), Some("Marina Beach".to_owned()));
        assert!(store.find_place(&"missing".into()).is_none());
    }

    #[rstest]
    fn missing_related_data_is_empty(store: MemoryStore) {
        let id = PlaceId::from("missing");
        assert!(store.fetch_attributes(&id).is_none());
        assert!(store.fetch_reviews(&id, 10).is_empty());
        assert!(store.fetch_history(&id).is_empty());
    }

    #[rstest]
    fn round_trips_records(store: MemoryStore) {
        let again = MemoryStore::from_records(store.records());
        assert_eq!(again.records(), store.records());
    }
}
