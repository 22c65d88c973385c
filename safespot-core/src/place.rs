//! Places and the canonical score fields persisted alongside them.

use std::fmt;

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Review, SafetyAttributes, SafetyHistory};

/// Trend score of a place with no upward or downward movement.
pub const NEUTRAL_TREND_SCORE: f64 = 50.0;

/// Raw trend signal above which a place counts as trending.
pub const RAW_TRENDING_THRESHOLD: f64 = 0.3;

/// [`RAW_TRENDING_THRESHOLD`] on the canonical 0–100 trend scale.
pub const TRENDING_THRESHOLD: f64 = 65.0;

/// Convert a raw trend signal on `[-1, 1]` to the canonical 0–100 scale.
///
/// Inputs outside the raw range are clamped first. This conversion belongs
/// at the ingestion boundary; persisted trend scores are already canonical.
///
/// # Examples
/// ```
/// use safespot_core::normalise_trend;
///
/// assert_eq!(normalise_trend(-1.0), 0.0);
/// assert_eq!(normalise_trend(0.0), 50.0);
/// assert_eq!(normalise_trend(3.0), 100.0);
/// ```
#[must_use]
pub fn normalise_trend(raw: f64) -> f64 {
    (raw.clamp(-1.0, 1.0) + 1.0) / 2.0 * 100.0
}

/// Stable identifier of a place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlaceId(String);

impl PlaceId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlaceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A point of interest with its persisted scores.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Score
/// fields share the 0–100 scale except `elo_score`, which lies in
/// `[1000, 2400]`. The scorer treats places as immutable input.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safespot_core::Place;
///
/// let place = Place::new("p1", "Marina Beach", Coord { x: 80.28, y: 13.05 })
///     .with_locality("Mylapore");
/// assert_eq!(place.lat(), 13.05);
/// assert_eq!(place.locality.as_deref(), Some("Mylapore"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Place {
    /// Unique identifier.
    pub id: PlaceId,
    /// Human readable name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Optional category such as `market` or `transit`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<String>,
    /// Neighbourhood or locality name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locality: Option<String>,
    /// Administrative district.
    #[cfg_attr(feature = "serde", serde(default))]
    pub district: Option<String>,
    /// Region or state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub region: Option<String>,
    /// Country name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub country: Option<String>,
    /// Precomputed safety score.
    pub safety_score: f64,
    /// Display rating derived from the safety score.
    pub elo_score: f64,
    /// Popularity signal.
    pub popularity_score: f64,
    /// Visitor experience signal (cleanliness, walkability).
    pub experience_score: f64,
    /// Canonical trend score; see [`normalise_trend`].
    pub trend_score: f64,
}

impl Place {
    /// Construct a place with neutral scores.
    pub fn new(id: impl Into<PlaceId>, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            category: None,
            locality: None,
            district: None,
            region: None,
            country: None,
            safety_score: 50.0,
            elo_score: 1000.0,
            popularity_score: 50.0,
            experience_score: 50.0,
            trend_score: NEUTRAL_TREND_SCORE,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.location.x
    }

    /// Set the category while returning `self` for chaining.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the locality while returning `self` for chaining.
    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }

    /// Set the safety score while returning `self` for chaining.
    #[must_use]
    pub const fn with_safety_score(mut self, score: f64) -> Self {
        self.safety_score = score;
        self
    }

    /// Set the popularity, experience and trend scores in one call.
    #[must_use]
    pub const fn with_signals(mut self, popularity: f64, experience: f64, trend: f64) -> Self {
        self.popularity_score = popularity;
        self.experience_score = experience;
        self.trend_score = trend;
        self
    }

    /// Whether the trend score exceeds [`TRENDING_THRESHOLD`].
    #[must_use]
    pub fn is_trending(&self) -> bool {
        self.trend_score > TRENDING_THRESHOLD
    }

    /// Check that the coordinates lie within WGS84 bounds.
    ///
    /// # Errors
    /// Returns [`PlaceError`] naming the offending axis. Non-finite values
    /// are rejected as out of range.
    pub fn validate_location(&self) -> Result<(), PlaceError> {
        let lat = self.lat();
        let lng = self.lng();
        if !(-90.0..=90.0).contains(&lat) {
            return Err(PlaceError::LatitudeOutOfRange {
                id: self.id.clone(),
                lat,
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(PlaceError::LongitudeOutOfRange {
                id: self.id.clone(),
                lng,
            });
        }
        Ok(())
    }
}

/// Errors returned by [`Place::validate_location`].
#[derive(Debug, Error, PartialEq)]
pub enum PlaceError {
    /// Latitude fell outside `[-90, 90]`.
    #[error("place {id} has latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Identifier of the place.
        id: PlaceId,
        /// Offending latitude.
        lat: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("place {id} has longitude {lng} outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Identifier of the place.
        id: PlaceId,
        /// Offending longitude.
        lng: f64,
    },
}

/// Everything a data source knows about one place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaceRecord {
    /// The place itself.
    pub place: Place,
    /// Latest attribute snapshot, when one exists.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: Option<SafetyAttributes>,
    /// Reviews in any order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reviews: Vec<Review>,
    /// Monthly history in any order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub history: Vec<SafetyHistory>,
}

impl PlaceRecord {
    /// Wrap a place with no related data.
    #[must_use]
    pub const fn new(place: Place) -> Self {
        Self {
            place,
            attributes: None,
            reviews: Vec::new(),
            history: Vec::new(),
        }
    }
}
