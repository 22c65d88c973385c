//! SQLite-backed store implementation for persisted places.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};
use rusqlite::{Connection, OpenFlags, Row};
use thiserror::Error;

use crate::{
    Place, PlaceId, PlaceQuery, Review, SafetyAttributes, SafetyHistory, TimeOfDay,
    distance::bounding_box,
};

use super::{PlaceStore, newest_first, schema::MONTH_FORMAT};

/// Error raised when reading persisted place data.
#[derive(Debug, Error)]
pub enum SqlitePlaceStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A stored timestamp was not valid RFC 3339.
    #[error("invalid timestamp {value:?} for {owner}: {source}")]
    InvalidTimestamp {
        /// Place or review owning the timestamp.
        owner: String,
        /// Raw stored value.
        value: String,
        /// Parse failure.
        #[source]
        source: chrono::ParseError,
    },
    /// A stored review tag payload was not valid JSON.
    #[error("failed to parse tags for review {id}: {source}")]
    InvalidTags {
        /// Identifier of the review.
        id: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored time-of-day label was not recognised.
    #[error("unknown time of day {value:?} for review {id}")]
    InvalidTimeOfDay {
        /// Identifier of the review.
        id: String,
        /// Raw stored value.
        value: String,
    },
    /// A stored history month was not a `YYYY-MM-DD` date.
    #[error("invalid history month {value:?} for place {place_id}: {source}")]
    InvalidMonth {
        /// Place owning the history entry.
        place_id: PlaceId,
        /// Raw stored value.
        value: String,
        /// Parse failure.
        #[source]
        source: chrono::ParseError,
    },
    /// Generic SQLite error when reading rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// R\*-tree entry keyed on `[longitude, latitude]`.
#[derive(Debug, Clone)]
struct IndexedPlace(Place);

impl RTreeObject for IndexedPlace {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.0.lng(), self.0.lat()])
    }
}

/// Read-only place store backed by an SQLite database.
///
/// The database is read once at [`SqlitePlaceStore::open`]; places are held
/// in an R\*-tree for bounding-box prefiltering and related rows are grouped
/// by place.
pub struct SqlitePlaceStore {
    index: RTree<IndexedPlace>,
    attributes: HashMap<PlaceId, SafetyAttributes>,
    reviews: HashMap<PlaceId, Vec<Review>>,
    history: HashMap<PlaceId, Vec<SafetyHistory>>,
}

impl fmt::Debug for SqlitePlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceStore")
            .field("places", &self.index.size())
            .field("attributes", &self.attributes.len())
            .finish_non_exhaustive()
    }
}

impl SqlitePlaceStore {
    /// Open and load the database at `database_path`.
    ///
    /// Places with coordinates outside WGS84 bounds are skipped with a
    /// warning. When several attribute snapshots exist for a place the most
    /// recent one wins.
    ///
    /// # Errors
    /// Returns [`SqlitePlaceStoreError`] when the database cannot be opened or
    /// a row fails to decode.
    pub fn open<P>(database_path: P) -> Result<Self, SqlitePlaceStoreError>
    where
        P: AsRef<Path>,
    {
        let database_path = database_path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| SqlitePlaceStoreError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;

        let places = load_places(&connection)?;
        let attributes = load_attributes(&connection)?;
        let reviews = load_reviews(&connection)?;
        let history = load_history(&connection)?;
        log::debug!(
            "loaded {} places, {} attribute snapshots, {} reviewed places from {}",
            places.len(),
            attributes.len(),
            reviews.len(),
            database_path.display()
        );

        Ok(Self {
            index: RTree::bulk_load(places),
            attributes,
            reviews,
            history,
        })
    }
}

impl PlaceStore for SqlitePlaceStore {
    fn fetch_places(&self, query: &PlaceQuery) -> Box<dyn Iterator<Item = Place> + Send + '_> {
        let bbox = query
            .center()
            .zip(query.radius_km)
            .map(|(center, radius)| bounding_box(center, radius));
        let mut places: Vec<Place> = match bbox {
            Some(bbox) => {
                let envelope = AABB::from_corners(
                    [bbox.min().x, bbox.min().y],
                    [bbox.max().x, bbox.max().y],
                );
                self.index
                    .locate_in_envelope_intersecting(&envelope)
                    .map(|entry| entry.0.clone())
                    .collect()
            }
            None => self.index.iter().map(|entry| entry.0.clone()).collect(),
        };

        places.sort_unstable_by(|a, b| a.id.cmp(&b.id));

        Box::new(places.into_iter())
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

fn parse_timestamp(owner: &str, value: String) -> Result<DateTime<Utc>, SqlitePlaceStoreError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| SqlitePlaceStoreError::InvalidTimestamp {
            owner: owner.to_owned(),
            value,
            source,
        })
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    let id: String = row.get("id")?;
    let name: String = row.get("name")?;
    let location = Coord {
        x: row.get("lng")?,
        y: row.get("lat")?,
    };
    let mut place = Place::new(id, name, location);
    place.category = row.get("category")?;
    place.locality = row.get("locality")?;
    place.district = row.get("district")?;
    place.region = row.get("region")?;
    place.country = row.get("country")?;
    place.safety_score = row.get("safety_score")?;
    place.elo_score = row.get("elo_score")?;
    place.popularity_score = row.get("popularity_score")?;
    place.experience_score = row.get("experience_score")?;
    place.trend_score = row.get("trend_score")?;
    Ok(place)
}

fn load_places(connection: &Connection) -> Result<Vec<IndexedPlace>, SqlitePlaceStoreError> {
    let mut statement = connection.prepare("SELECT * FROM places")?;
    let mut rows = statement.query([])?;
    let mut places = Vec::new();

    while let Some(row) = rows.next()? {
        let place = place_from_row(row)?;
        if let Err(err) = place.validate_location() {
            log::warn!("skipping stored place: {err}");
            continue;
        }
        places.push(IndexedPlace(place));
    }

    Ok(places)
}

fn load_attributes(
    connection: &Connection,
) -> Result<HashMap<PlaceId, SafetyAttributes>, SqlitePlaceStoreError> {
    let mut statement = connection.prepare("SELECT * FROM safety_attributes")?;
    let mut rows = statement.query([])?;
    let mut latest: HashMap<PlaceId, SafetyAttributes> = HashMap::new();

    while let Some(row) = rows.next()? {
        let place_id: String = row.get("place_id")?;
        let data_timestamp = row
            .get::<_, Option<String>>("data_timestamp")?
            .map(|raw| parse_timestamp(&place_id, raw))
            .transpose()?;
        let attrs = SafetyAttributes {
            place_id: PlaceId::from(place_id),
            violent_crime: row.get("violent_crime")?,
            property_crime: row.get("property_crime")?,
            accident_rate: row.get("accident_rate")?,
            safety_infra: row.get("safety_infra")?,
            police_density: row.get("police_density")?,
            cctv_coverage: row.get("cctv_coverage")?,
            lighting_score: row.get("lighting_score")?,
            night_safety_score: row.get("night_safety_score")?,
            women_safety_score: row.get("women_safety_score")?,
            tourist_safety_score: row.get("tourist_safety_score")?,
            crowd_safety_score: row.get("crowd_safety_score")?,
            pickpocket_risk: row.get("pickpocket_risk")?,
            confidence_score: row.get("confidence_score")?,
            data_timestamp,
            data_source: row.get("data_source")?,
        };
        let newer = latest
            .get(&attrs.place_id)
            .is_none_or(|current| attrs.data_timestamp >= current.data_timestamp);
        if newer {
            latest.insert(attrs.place_id.clone(), attrs);
        }
    }

    Ok(latest)
}

fn load_reviews(
    connection: &Connection,
) -> Result<HashMap<PlaceId, Vec<Review>>, SqlitePlaceStoreError> {
    let mut statement = connection.prepare("SELECT * FROM reviews")?;
    let mut rows = statement.query([])?;
    let mut grouped: HashMap<PlaceId, Vec<Review>> = HashMap::new();

    while let Some(row) = rows.next()? {
        let id: String = row.get("id")?;
        let tags_json: String = row.get("tags")?;
        let tags: Vec<String> =
            serde_json::from_str(&tags_json).map_err(|source| SqlitePlaceStoreError::InvalidTags {
                id: id.clone(),
                source,
            })?;
        let time_of_day = row
            .get::<_, Option<String>>("time_of_day")?
            .map(|value| {
                value
                    .parse::<TimeOfDay>()
                    .map_err(|_| SqlitePlaceStoreError::InvalidTimeOfDay {
                        id: id.clone(),
                        value,
                    })
            })
            .transpose()?;
        let created_at = parse_timestamp(&id, row.get("created_at")?)?;
        let place_id = PlaceId::from(row.get::<_, String>("place_id")?);
        let review = Review {
            id,
            place_id: place_id.clone(),
            user_id: row.get("user_id")?,
            safety_rating: row.get("safety_rating")?,
            cleanliness_rating: row.get("cleanliness_rating")?,
            police_response_rating: row.get("police_response_rating")?,
            overall_rating: row.get("overall_rating")?,
            review_text: row.get("review_text")?,
            tags,
            time_of_day,
            created_at,
        };
        grouped.entry(place_id).or_default().push(review);
    }

    Ok(grouped)
}

fn load_history(
    connection: &Connection,
) -> Result<HashMap<PlaceId, Vec<SafetyHistory>>, SqlitePlaceStoreError> {
    let mut statement = connection.prepare("SELECT * FROM safety_history")?;
    let mut rows = statement.query([])?;
    let mut grouped: HashMap<PlaceId, Vec<SafetyHistory>> = HashMap::new();

    while let Some(row) = rows.next()? {
        let place_id = PlaceId::from(row.get::<_, String>("place_id")?);
        let raw_month: String = row.get("month")?;
        let month = NaiveDate::parse_from_str(&raw_month, MONTH_FORMAT).map_err(|source| {
            SqlitePlaceStoreError::InvalidMonth {
                place_id: place_id.clone(),
                value: raw_month.clone(),
                source,
            }
        })?;
        let entry = SafetyHistory {
            place_id: place_id.clone(),
            month,
            safety_score: row.get("safety_score")?,
            crime_index: row.get("crime_index")?,
            infra_index: row.get("infra_index")?,
            review_score: row.get("review_score")?,
            violent_incidents: row.get("violent_incidents")?,
            property_incidents: row.get("property_incidents")?,
            accident_incidents: row.get("accident_incidents")?,
        };
        grouped.entry(place_id).or_default().push(entry);
    }

    Ok(grouped)
}
