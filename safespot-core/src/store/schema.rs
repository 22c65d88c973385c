//! SQLite schema shared by the persistent store and the ingestion pipeline.

use rusqlite::{Connection, params};

use crate::{PlaceRecord, Review};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS places (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    lng REAL NOT NULL,
    lat REAL NOT NULL,
    category TEXT,
    locality TEXT,
    district TEXT,
    region TEXT,
    country TEXT,
    safety_score REAL NOT NULL,
    elo_score REAL NOT NULL,
    popularity_score REAL NOT NULL,
    experience_score REAL NOT NULL,
    trend_score REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS safety_attributes (
    place_id TEXT NOT NULL REFERENCES places(id),
    violent_crime REAL NOT NULL,
    property_crime REAL NOT NULL,
    accident_rate REAL NOT NULL,
    safety_infra REAL NOT NULL,
    police_density REAL NOT NULL,
    cctv_coverage REAL NOT NULL,
    lighting_score REAL NOT NULL,
    night_safety_score REAL NOT NULL,
    women_safety_score REAL NOT NULL,
    tourist_safety_score REAL NOT NULL,
    crowd_safety_score REAL NOT NULL,
    pickpocket_risk REAL NOT NULL,
    confidence_score REAL,
    data_timestamp TEXT,
    data_source TEXT
);
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    place_id TEXT NOT NULL REFERENCES places(id),
    user_id TEXT,
    safety_rating INTEGER NOT NULL,
    cleanliness_rating INTEGER,
    police_response_rating INTEGER,
    overall_rating INTEGER,
    review_text TEXT,
    tags TEXT NOT NULL,
    time_of_day TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS safety_history (
    place_id TEXT NOT NULL REFERENCES places(id),
    month TEXT NOT NULL,
    safety_score REAL NOT NULL,
    crime_index REAL,
    infra_index REAL,
    review_score REAL,
    violent_incidents INTEGER NOT NULL,
    property_incidents INTEGER NOT NULL,
    accident_incidents INTEGER NOT NULL,
    PRIMARY KEY (place_id, month)
);
CREATE INDEX IF NOT EXISTS reviews_place_idx ON reviews(place_id);
";

/// Date format used for history months.
pub(crate) const MONTH_FORMAT: &str = "%Y-%m-%d";

/// Create the tables if they do not exist yet.
///
/// # Errors
/// Returns the underlying SQLite error.
pub fn create_schema(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(SCHEMA)
}

/// Upsert a place and its related rows; attribute snapshots are appended.
///
/// Timestamps are written as RFC 3339 text and tags as a JSON array.
///
/// # Errors
/// Returns the underlying SQLite error, or a conversion failure when tags
/// cannot be encoded.
pub fn insert_record(connection: &Connection, record: &PlaceRecord) -> rusqlite::Result<()> {
    let place = &record.place;
    connection.execute(
        "INSERT INTO places (
            id, name, lng, lat, category, locality, district, region, country,
            safety_score, elo_score, popularity_score, experience_score, trend_score
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name, lng = excluded.lng, lat = excluded.lat,
            category = excluded.category, locality = excluded.locality,
            district = excluded.district, region = excluded.region,
            country = excluded.country, safety_score = excluded.safety_score,
            elo_score = excluded.elo_score, popularity_score = excluded.popularity_score,
            experience_score = excluded.experience_score, trend_score = excluded.trend_score",
        params![
            place.id.as_str(),
            place.name,
            place.lng(),
            place.lat(),
            place.category,
            place.locality,
            place.district,
            place.region,
            place.country,
            place.safety_score,
            place.elo_score,
            place.popularity_score,
            place.experience_score,
            place.trend_score,
        ],
    )?;

    if let Some(attrs) = &record.attributes {
        connection.execute(
            "INSERT INTO safety_attributes (
                place_id, violent_crime, property_crime, accident_rate, safety_infra,
                police_density, cctv_coverage, lighting_score, night_safety_score,
                women_safety_score, tourist_safety_score, crowd_safety_score,
                pickpocket_risk, confidence_score, data_timestamp, data_source
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                attrs.place_id.as_str(),
                attrs.violent_crime,
                attrs.property_crime,
                attrs.accident_rate,
                attrs.safety_infra,
                attrs.police_density,
                attrs.cctv_coverage,
                attrs.lighting_score,
                attrs.night_safety_score,
                attrs.women_safety_score,
                attrs.tourist_safety_score,
                attrs.crowd_safety_score,
                attrs.pickpocket_risk,
                attrs.confidence_score,
                attrs.data_timestamp.map(|t| t.to_rfc3339()),
                attrs.data_source,
            ],
        )?;
    }

    for review in &record.reviews {
        insert_review(connection, review)?;
    }

    for entry in &record.history {
        connection.execute(
            "INSERT OR REPLACE INTO safety_history (
                place_id, month, safety_score, crime_index, infra_index, review_score,
                violent_incidents, property_incidents, accident_incidents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.place_id.as_str(),
                entry.month.format(MONTH_FORMAT).to_string(),
                entry.safety_score,
                entry.crime_index,
                entry.infra_index,
                entry.review_score,
                entry.violent_incidents,
                entry.property_incidents,
                entry.accident_incidents,
            ],
        )?;
    }

    Ok(())
}

/// Insert or replace one review row keyed by its id.
///
/// # Errors
/// Returns the underlying SQLite error, or a conversion failure when tags
/// cannot be encoded.
pub fn insert_review(connection: &Connection, review: &Review) -> rusqlite::Result<()> {
    let tags = serde_json::to_string(&review.tags)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
    connection.execute(
        "INSERT OR REPLACE INTO reviews (
            id, place_id, user_id, safety_rating, cleanliness_rating,
            police_response_rating, overall_rating, review_text, tags,
            time_of_day, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            review.id,
            review.place_id.as_str(),
            review.user_id,
            review.safety_rating,
            review.cleanliness_rating,
            review.police_response_rating,
            review.overall_rating,
            review.review_text,
            tags,
            review.time_of_day.map(|t| t.as_str()),
            review.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}
