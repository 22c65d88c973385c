//! Fixture builders shared by unit, behaviour and downstream crate tests.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use geo::Coord;

use crate::{Place, PlaceId, PlaceRecord, Review, SafetyAttributes, SafetyHistory, TimeOfDay};

/// Fixed reference instant used as "now" by deterministic tests.
#[must_use]
pub fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// First day of `year`-`month`.
#[must_use]
pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

/// Attribute snapshot with moderate crime and good infrastructure.
#[must_use]
pub fn sample_attributes(place_id: impl Into<PlaceId>, now: DateTime<Utc>) -> SafetyAttributes {
    SafetyAttributes {
        place_id: place_id.into(),
        violent_crime: 20.0,
        property_crime: 30.0,
        accident_rate: 10.0,
        safety_infra: 70.0,
        police_density: 60.0,
        cctv_coverage: 70.0,
        lighting_score: 80.0,
        night_safety_score: 65.0,
        women_safety_score: 70.0,
        tourist_safety_score: 72.0,
        crowd_safety_score: 60.0,
        pickpocket_risk: 25.0,
        confidence_score: Some(0.8),
        data_timestamp: Some(now - Duration::days(10)),
        data_source: Some("fixture".to_owned()),
    }
}

fn record(
    id: &str,
    name: &str,
    location: Coord<f64>,
    category: &str,
    locality: &str,
    scores: [f64; 4],
) -> Place {
    let [safety, popularity, experience, trend] = scores;
    let mut place = Place::new(id, name, location)
        .with_category(category)
        .with_locality(locality)
        .with_safety_score(safety)
        .with_signals(popularity, experience, trend);
    place.elo_score = (1000.0 + 1400.0 * safety / 100.0).round();
    place.region = Some("Tamil Nadu".to_owned());
    place.country = Some("India".to_owned());
    place
}

/// A small city dataset with attributes, reviews and history.
///
/// `marina` carries the richest data: three reviews (two at night) and
/// three months of history. `cubbon` sits in another city for distance tests.
#[must_use]
pub fn sample_records(now: DateTime<Utc>) -> Vec<PlaceRecord> {
    let marina = PlaceRecord {
        place: record(
            "marina",
            "Marina Beach",
            Coord { x: 80.2824, y: 13.05 },
            "beach",
            "Mylapore",
            [72.0, 90.0, 70.0, 70.0],
        ),
        attributes: Some(sample_attributes("marina", now)),
        reviews: vec![
            Review::new("marina-r1", "marina", 4, now - Duration::days(2))
                .at(TimeOfDay::Night)
                .tagged("well lit"),
            Review::new("marina-r2", "marina", 2, now - Duration::days(5))
                .at(TimeOfDay::LateNight)
                .tagged("crowded"),
            Review {
                cleanliness_rating: Some(3),
                police_response_rating: Some(4),
                review_text: Some("Busy but patrolled".to_owned()),
                ..Review::new("marina-r3", "marina", 5, now - Duration::days(45))
                    .at(TimeOfDay::Evening)
            },
        ],
        history: vec![
            SafetyHistory::new("marina", month(2024, 4), 66.0),
            SafetyHistory::new("marina", month(2024, 6), 74.0),
            SafetyHistory::new("marina", month(2024, 5), 70.0),
        ],
    };

    let temple = PlaceRecord {
        attributes: Some(SafetyAttributes {
            pickpocket_risk: 45.0,
            ..sample_attributes("kapaleeshwarar", now)
        }),
        ..PlaceRecord::new(record(
            "kapaleeshwarar",
            "Kapaleeshwarar Temple",
            Coord {
                x: 80.2697,
                y: 13.0339,
            },
            "temple",
            "Mylapore",
            [68.0, 75.0, 80.0, 55.0],
        ))
    };

    let market = PlaceRecord::new(record(
        "tnagar",
        "T. Nagar Market",
        Coord {
            x: 80.2337,
            y: 13.0418,
        },
        "market",
        "T. Nagar",
        [45.0, 95.0, 50.0, 30.0],
    ));

    let central = PlaceRecord::new(record(
        "central",
        "Chennai Central",
        Coord {
            x: 80.2750,
            y: 13.0827,
        },
        "transit",
        "Park Town",
        [38.0, 85.0, 40.0, 50.0],
    ));

    let mut park = record(
        "cubbon",
        "Cubbon Park",
        Coord {
            x: 77.5946,
            y: 12.9763,
        },
        "park",
        "Bengaluru Central",
        [81.0, 70.0, 85.0, 80.0],
    );
    park.region = Some("Karnataka".to_owned());

    vec![marina, temple, market, central, PlaceRecord::new(park)]
}

/// Persist `records` into a fresh SQLite database at `path`.
///
/// # Errors
/// Returns the underlying SQLite error.
#[cfg(feature = "store-sqlite")]
pub fn write_sqlite_database(
    path: &std::path::Path,
    records: &[PlaceRecord],
) -> rusqlite::Result<()> {
    let connection = rusqlite::Connection::open(path)?;
    crate::create_schema(&connection)?;
    for record in records {
        crate::insert_record(&connection, record)?;
    }
    Ok(())
}
