//! Filtering, distance annotation, sorting and pagination of places.
//!
//! [`query_places`] is a pure function over an in-memory collection. Stores
//! may narrow the collection beforehand (for example with a bounding box)
//! but the exact filters always run here.

use std::{cmp::Ordering, fmt, str::FromStr};

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Place, distance::distance_between, distance::round_distance};

/// Default page size.
pub const DEFAULT_LIMIT: usize = 50;

/// Field used to order query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortField {
    /// `Place::safety_score`.
    #[default]
    SafetyScore,
    /// `Place::elo_score`.
    EloScore,
    /// `Place::popularity_score`.
    Popularity,
    /// `Place::experience_score`.
    Experience,
    /// `Place::trend_score`.
    Trend,
    /// Distance from the query centre.
    Distance,
}

impl SortField {
    /// Canonical snake case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SafetyScore => "safety_score",
            Self::EloScore => "elo_score",
            Self::Popularity => "popularity_score",
            Self::Experience => "experience_score",
            Self::Trend => "trend_score",
            Self::Distance => "distance",
        }
    }

    fn value(self, place: &Place) -> f64 {
        let raw = match self {
            Self::SafetyScore => place.safety_score,
            Self::EloScore => place.elo_score,
            Self::Popularity => place.popularity_score,
            Self::Experience => place.experience_score,
            Self::Trend => place.trend_score,
            Self::Distance => return 0.0,
        };
        if raw.is_nan() { 0.0 } else { raw }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safety_score" | "safety" => Ok(Self::SafetyScore),
            "elo_score" | "elo" => Ok(Self::EloScore),
            "popularity_score" | "popularity" => Ok(Self::Popularity),
            "experience_score" | "experience" => Ok(Self::Experience),
            "trend_score" | "trend" => Ok(Self::Trend),
            "distance" => Ok(Self::Distance),
            _ => Err(format!("unknown sort field: {s}")),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(format!("unknown sort order: {s}")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Parameters of a place query. Every filter is optional.
///
/// Distance annotation and the radius filter only apply when both `lat` and
/// `lng` are present.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaceQuery {
    /// Latitude of the search centre.
    pub lat: Option<f64>,
    /// Longitude of the search centre.
    pub lng: Option<f64>,
    /// Maximum distance from the centre in kilometres.
    pub radius_km: Option<f64>,
    /// Inclusive lower bound on `safety_score`.
    pub min_safety_score: Option<f64>,
    /// Inclusive upper bound on `safety_score`.
    pub max_safety_score: Option<f64>,
    /// Exact category.
    pub category: Option<String>,
    /// Case-insensitive locality substring.
    pub locality: Option<String>,
    /// Keep only trending places.
    pub trending: bool,
    /// Page size.
    pub limit: usize,
    /// Number of results to skip.
    pub offset: usize,
    /// Ordering field.
    pub sort_by: SortField,
    /// Ordering direction.
    pub sort_order: SortOrder,
}

impl Default for PlaceQuery {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            radius_km: None,
            min_safety_score: None,
            max_safety_score: None,
            category: None,
            locality: None,
            trending: false,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl PlaceQuery {
    /// Search centre when both coordinates are set.
    #[must_use]
    pub const fn center(&self) -> Option<Coord<f64>> {
        match (self.lat, self.lng) {
            (Some(y), Some(x)) => Some(Coord { x, y }),
            _ => None,
        }
    }

    /// Set the search centre.
    #[must_use]
    pub const fn near(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Set the search radius.
    #[must_use]
    pub const fn within_km(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    /// Set the ordering.
    #[must_use]
    pub const fn sorted(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    fn admits(&self, place: &Place) -> bool {
        let within_bounds = self
            .min_safety_score
            .is_none_or(|min| place.safety_score >= min)
            && self
                .max_safety_score
                .is_none_or(|max| place.safety_score <= max);
        if !within_bounds {
            return false;
        }
        if let Some(category) = &self.category
            && place.category.as_deref() != Some(category.as_str())
        {
            return false;
        }
        if let Some(needle) = &self.locality {
            let needle = needle.to_lowercase();
            let matches = place
                .locality
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&needle));
            if !matches {
                return false;
            }
        }
        !self.trending || place.is_trending()
    }
}

/// A query result annotated with its distance from the query centre.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RankedPlace {
    /// Matching place.
    pub place: Place,
    /// Unrounded distance in kilometres when the query had a centre.
    pub distance_km: Option<f64>,
}

impl RankedPlace {
    /// Distance rounded to two decimals for display.
    #[must_use]
    pub fn rounded_distance_km(&self) -> Option<f64> {
        self.distance_km.map(round_distance)
    }
}

fn compare_distance(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    let known = |d: Option<f64>| d.filter(|v| !v.is_nan());
    match (known(a), known(b)) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.total_cmp(&y),
            SortOrder::Desc => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter, annotate, sort and paginate `places`.
///
/// Steps run in this order: score, category, locality and trending filters;
/// distance annotation; radius filter; stable sort; pagination. Missing or
/// `NaN` score values sort as zero. Unknown distances sort last in either
/// direction and never pass the radius filter.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safespot_core::{Place, PlaceQuery, SortField, SortOrder, query_places};
///
/// let places = [90.0, 40.0, 70.0, 60.0]
///     .into_iter()
///     .enumerate()
///     .map(|(i, s)| {
///         Place::new(format!("p{i}"), "Spot", Coord { x: 0.0, y: 0.0 }).with_safety_score(s)
///     });
/// let query = PlaceQuery {
///     min_safety_score: Some(60.0),
///     limit: 2,
///     ..PlaceQuery::default()
/// }
/// .sorted(SortField::SafetyScore, SortOrder::Desc);
///
/// let scores: Vec<f64> = query_places(places, &query)
///     .into_iter()
///     .map(|r| r.place.safety_score)
///     .collect();
/// assert_eq!(scores, vec![90.0, 70.0]);
/// ```
pub fn query_places<I>(places: I, query: &PlaceQuery) -> Vec<RankedPlace>
where
    I: IntoIterator<Item = Place>,
{
    let center = query.center();
    let mut ranked: Vec<RankedPlace> = places
        .into_iter()
        .filter(|place| query.admits(place))
        .map(|place| RankedPlace {
            distance_km: center.map(|c| distance_between(c, place.location)),
            place,
        })
        .filter(|ranked| match (center, query.radius_km, ranked.distance_km) {
            (Some(_), Some(radius), Some(d)) => d <= radius,
            _ => true,
        })
        .collect();

    match query.sort_by {
        SortField::Distance if center.is_some() => ranked
            .sort_by(|a, b| compare_distance(a.distance_km, b.distance_km, query.sort_order)),
        SortField::Distance => {}
        field => ranked.sort_by(|a, b| {
            let (x, y) = (field.value(&a.place), field.value(&b.place));
            match query.sort_order {
                SortOrder::Asc => x.total_cmp(&y),
                SortOrder::Desc => y.total_cmp(&x),
            }
        }),
    }

    ranked
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect()
}

/// Places whose name contains `needle`, ignoring case.
///
/// An empty needle matches every place. Input order is preserved.
pub fn search_by_name<I>(places: I, needle: &str) -> Vec<Place>
where
    I: IntoIterator<Item = Place>,
{
    let needle = needle.trim().to_lowercase();
    places
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}
