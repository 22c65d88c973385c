//! Adapter for the flat legacy place format.
//!
//! Legacy fixtures carry crime and infrastructure readings inline on each
//! place together with a raw trend on `[-1, 1]`:
//!
//! ```json
//! { "places": [{
//!     "id": "marina", "name": "Marina Beach", "lat": 13.05, "lng": 80.28,
//!     "crime": { "violent": 20, "property": 30, "accident": 10 },
//!     "infra": { "cctv": 70, "lighting": 80, "policeDensity": 60 },
//!     "popularity": 90, "experience": 70, "trend": 0.4,
//!     "reviews": []
//! }] }
//! ```
//!
//! [`LegacyPlace::into_record`] turns each entry into a canonical
//! [`PlaceRecord`]. The safety score comes from the canonical attribute
//! scorer and the trend is normalised onto the 0–100 scale exactly once here.
//! A place missing either reading block scores a neutral 50; absent data is
//! never read as evidence of safety.

use chrono::{DateTime, Utc};
use geo::Coord;
use safespot_core::{
    NEUTRAL_TREND_SCORE, Place, PlaceId, PlaceRecord, Review, SafetyAttributes, normalise_trend,
};
use safespot_scorer::{SafetySignals, safety_from_signals};
use serde::Deserialize;

/// Provenance label stamped on attributes derived from legacy data.
pub const LEGACY_SOURCE: &str = "legacy-fixture";

const LEGACY_CONFIDENCE: f64 = 0.7;
const DEFAULT_SIGNAL: f64 = 50.0;
const NEUTRAL_SAFETY_SCORE: f64 = 50.0;
const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

/// Top-level legacy document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyFixture {
    /// Places in file order.
    pub places: Vec<LegacyPlace>,
}

/// Crime rates on `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LegacyCrime {
    /// Violent crime.
    pub violent: f64,
    /// Property crime.
    pub property: f64,
    /// Traffic accidents.
    pub accident: f64,
}

impl Default for LegacyCrime {
    fn default() -> Self {
        Self {
            violent: DEFAULT_SIGNAL,
            property: DEFAULT_SIGNAL,
            accident: DEFAULT_SIGNAL,
        }
    }
}

/// Infrastructure coverage on `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInfra {
    /// CCTV coverage.
    pub cctv: f64,
    /// Street lighting.
    pub lighting: f64,
    /// Police presence.
    pub police_density: f64,
}

impl Default for LegacyInfra {
    fn default() -> Self {
        Self {
            cctv: DEFAULT_SIGNAL,
            lighting: DEFAULT_SIGNAL,
            police_density: DEFAULT_SIGNAL,
        }
    }
}

/// Review in the legacy shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReview {
    /// Review identifier.
    pub id: String,
    /// Display name of the author.
    #[serde(default)]
    pub author: Option<String>,
    /// Overall star rating.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Free text.
    #[serde(default)]
    pub comment: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Safety rating; falls back to `rating` when absent.
    #[serde(default)]
    pub safety_rating: Option<u8>,
    /// Cleanliness rating.
    #[serde(default)]
    pub cleanliness_rating: Option<u8>,
    /// Police response rating.
    #[serde(default)]
    pub police_response_rating: Option<u8>,
    /// RFC 3339 creation time.
    pub timestamp: DateTime<Utc>,
}

/// Place in the legacy shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyPlace {
    /// Place identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Crime readings; 50 across the board when absent.
    #[serde(default)]
    pub crime: Option<LegacyCrime>,
    /// Infrastructure readings; 50 across the board when absent.
    #[serde(default)]
    pub infra: Option<LegacyInfra>,
    /// Popularity; 50 when absent.
    #[serde(default)]
    pub popularity: Option<f64>,
    /// Experience; 50 when absent.
    #[serde(default)]
    pub experience: Option<f64>,
    /// Raw trend on `[-1, 1]`; neutral when absent.
    #[serde(default)]
    pub trend: Option<f64>,
    /// Embedded reviews.
    #[serde(default)]
    pub reviews: Vec<LegacyReview>,
}

impl LegacyPlace {
    /// Convert into a canonical record stamped with `now`.
    ///
    /// Reviews without a usable safety rating are dropped with a warning.
    /// Without both crime and infrastructure readings the safety score is
    /// the neutral 50.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "derives rating and night score")]
    pub fn into_record(self, now: DateTime<Utc>) -> PlaceRecord {
        let id = PlaceId::new(self.id);
        let (crime, infra, safety) = match (self.crime, self.infra) {
            (Some(crime), Some(infra)) => {
                let signals = SafetySignals {
                    violent_crime: crime.violent,
                    property_crime: crime.property,
                    accident_rate: crime.accident,
                    cctv_coverage: infra.cctv,
                    lighting_score: infra.lighting,
                    police_density: infra.police_density,
                };
                (crime, infra, safety_from_signals(&signals))
            }
            (crime, infra) => {
                log::warn!("legacy place {id} lacks crime or infrastructure readings; scoring 50");
                (
                    crime.unwrap_or_default(),
                    infra.unwrap_or_default(),
                    NEUTRAL_SAFETY_SCORE,
                )
            }
        };

        let mut place = Place::new(id.clone(), self.name, Coord {
            x: self.lng,
            y: self.lat,
        })
        .with_safety_score(safety)
        .with_signals(
            self.popularity.unwrap_or(DEFAULT_SIGNAL),
            self.experience.unwrap_or(DEFAULT_SIGNAL),
            self.trend.map_or(NEUTRAL_TREND_SCORE, normalise_trend),
        );
        place.elo_score = 1000.0 + 1400.0 * safety / 100.0;

        let attributes = SafetyAttributes {
            violent_crime: crime.violent,
            property_crime: crime.property,
            accident_rate: crime.accident,
            safety_infra: (infra.cctv + infra.lighting + infra.police_density) / 3.0,
            police_density: infra.police_density,
            cctv_coverage: infra.cctv,
            lighting_score: infra.lighting,
            night_safety_score: 0.5 * infra.lighting + 0.3 * infra.police_density + 0.2 * infra.cctv,
            pickpocket_risk: crime.property,
            confidence_score: Some(LEGACY_CONFIDENCE),
            data_source: Some(LEGACY_SOURCE.to_owned()),
            ..SafetyAttributes::neutral(id.clone(), now)
        };

        let reviews = self
            .reviews
            .into_iter()
            .filter_map(|review| convert_review(&id, review))
            .collect();

        PlaceRecord {
            place,
            attributes: Some(attributes),
            reviews,
            history: Vec::new(),
        }
    }
}

fn in_range(rating: u8) -> Option<u8> {
    (MIN_RATING..=MAX_RATING).contains(&rating).then_some(rating)
}

fn convert_review(place_id: &PlaceId, review: LegacyReview) -> Option<Review> {
    let Some(safety_rating) = review.safety_rating.or(review.rating).and_then(in_range) else {
        log::warn!(
            "skipping legacy review {} for place {place_id}: no safety rating in 1..=5",
            review.id
        );
        return None;
    };
    Some(Review {
        id: review.id,
        place_id: place_id.clone(),
        user_id: review.author,
        safety_rating,
        cleanliness_rating: review.cleanliness_rating.and_then(in_range),
        police_response_rating: review.police_response_rating.and_then(in_range),
        overall_rating: review.rating.and_then(in_range),
        review_text: review.comment,
        tags: review.tags,
        time_of_day: None,
        created_at: review.timestamp,
    })
}
