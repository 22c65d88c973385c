//! SQLite persistence for canonical place records.

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError, OpenFlags};
use safespot_core::{
    PlaceId, PlaceRecord, Review, ReviewError, create_schema, insert_record, insert_review,
};
use serde::Serialize;
use thiserror::Error;

use crate::fs;

/// Row counts written by [`persist_records_to_sqlite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IngestSummary {
    /// Places inserted or replaced.
    pub places: usize,
    /// Attribute snapshots appended.
    pub attribute_snapshots: usize,
    /// Reviews inserted or replaced.
    pub reviews: usize,
    /// History months inserted or replaced.
    pub history: usize,
}

impl IngestSummary {
    /// Count the rows `records` will produce.
    #[must_use]
    pub fn from_records(records: &[PlaceRecord]) -> Self {
        records.iter().fold(Self::default(), |acc, record| Self {
            places: acc.places + 1,
            attribute_snapshots: acc.attribute_snapshots + usize::from(record.attributes.is_some()),
            reviews: acc.reviews + record.reviews.len(),
            history: acc.history + record.history.len(),
        })
    }
}

/// Errors raised when persisting records to SQLite.
#[derive(Debug, Error)]
pub enum PersistPlacesError {
    /// Failed to create the parent directory for the database.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Enabling foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin place persistence transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the tables failed.
    #[error("failed to create SafeSpot schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing one record failed.
    #[error("failed to persist place {place_id}")]
    PersistRecord {
        /// Place whose rows failed to write.
        place_id: PlaceId,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit place persistence transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Write `records` to the SQLite database at `path` in one transaction.
///
/// Parent directories and tables are created when missing. Places, reviews
/// and history months replace rows with the same key; attribute snapshots
/// are appended and readers keep the newest.
///
/// # Errors
/// Returns [`PersistPlacesError`] naming the step that failed. Nothing is
/// committed when any record fails.
pub fn persist_records_to_sqlite(
    path: &Utf8Path,
    records: &[PlaceRecord],
) -> Result<IngestSummary, PersistPlacesError> {
    fs::ensure_parent_dir(path).map_err(|source| PersistPlacesError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| PersistPlacesError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| PersistPlacesError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| PersistPlacesError::BeginTransaction { source })?;
    create_schema(&transaction).map_err(|source| PersistPlacesError::CreateSchema { source })?;
    for record in records {
        insert_record(&transaction, record).map_err(|source| {
            PersistPlacesError::PersistRecord {
                place_id: record.place.id.clone(),
                source,
            }
        })?;
    }
    transaction
        .commit()
        .map_err(|source| PersistPlacesError::Commit { source })?;

    let summary = IngestSummary::from_records(records);
    log::info!(
        "persisted {} places, {} attribute snapshots, {} reviews and {} history months to {path}",
        summary.places,
        summary.attribute_snapshots,
        summary.reviews,
        summary.history,
    );
    Ok(summary)
}

/// Errors raised when appending a review to an existing database.
#[derive(Debug, Error)]
pub enum AppendReviewError {
    /// The review failed validation.
    #[error(transparent)]
    Invalid(#[from] ReviewError),
    /// Opening the database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Enabling foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Checking for the reviewed place failed.
    #[error("failed to look up place {place_id}")]
    Lookup {
        /// Reviewed place.
        place_id: PlaceId,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The reviewed place is not in the database.
    #[error("no place with id {place_id}")]
    UnknownPlace {
        /// Reviewed place.
        place_id: PlaceId,
    },
    /// Writing the review row failed.
    #[error("failed to write review {review_id}")]
    Insert {
        /// Review identifier.
        review_id: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Validate `review` and write it to the existing database at `path`.
///
/// The database must already hold the reviewed place. A review with the
/// same id replaces the stored one.
///
/// # Errors
/// Returns [`AppendReviewError`] when validation fails, the database cannot
/// be opened, or the place is unknown.
pub fn append_review_to_sqlite(
    path: &Utf8Path,
    review: &Review,
) -> Result<(), AppendReviewError> {
    review.validate()?;
    let connection = Connection::open_with_flags(
        path.as_std_path(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|source| AppendReviewError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| AppendReviewError::ForeignKeys { source })?;

    let known: bool = connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM places WHERE id = ?1)",
            [review.place_id.as_str()],
            |row| row.get(0),
        )
        .map_err(|source| AppendReviewError::Lookup {
            place_id: review.place_id.clone(),
            source,
        })?;
    if !known {
        return Err(AppendReviewError::UnknownPlace {
            place_id: review.place_id.clone(),
        });
    }

    insert_review(&connection, review).map_err(|source| AppendReviewError::Insert {
        review_id: review.id.clone(),
        source,
    })?;
    log::info!("stored review {} for {} in {path}", review.id, review.place_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use safespot_core::{
        PlaceQuery, PlaceStore, SqlitePlaceStore,
        test_support::{sample_records, stamp},
    };
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn db_path(dir: &TempDir, relative: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(relative)).expect("utf-8 path")
    }

    fn count(path: &Utf8Path, table: &str) -> i64 {
        let conn = Connection::open(path.as_std_path()).expect("open database");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count rows")
    }

    #[rstest]
    fn persists_records(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        let records = sample_records(stamp());

        let summary = persist_records_to_sqlite(&path, &records).expect("persist records");

        assert_eq!(summary.places, 5);
        assert_eq!(summary.attribute_snapshots, 2);
        assert_eq!(summary.reviews, 3);
        assert_eq!(summary.history, 3);
        assert_eq!(count(&path, "places"), 5);
        assert_eq!(count(&path, "reviews"), 3);
        assert_eq!(count(&path, "safety_history"), 3);
    }

    #[rstest]
    fn persisted_records_read_back_through_store(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        persist_records_to_sqlite(&path, &sample_records(stamp())).expect("persist records");

        let store = SqlitePlaceStore::open(path.as_std_path()).expect("open store");
        let ids: Vec<_> = store
            .fetch_places(&PlaceQuery::default())
            .map(|place| place.id)
            .collect();
        assert_eq!(ids.len(), 5);
        assert!(store.fetch_attributes(&PlaceId::new("marina")).is_some());
        assert_eq!(store.fetch_reviews(&PlaceId::new("marina"), 10).len(), 3);
    }

    #[rstest]
    fn reingesting_replaces_places(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        let records = sample_records(stamp());
        persist_records_to_sqlite(&path, &records).expect("first ingest");
        persist_records_to_sqlite(&path, &records).expect("second ingest");

        assert_eq!(count(&path, "places"), 5);
        assert_eq!(count(&path, "reviews"), 3);
        assert_eq!(count(&path, "safety_attributes"), 4);
    }

    #[rstest]
    fn creates_parent_directory(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "nested/deeper/places.db");
        persist_records_to_sqlite(&path, &[]).expect("persist into nested path");
        assert!(path.exists(), "database should be created at nested path");
    }

    #[rstest]
    fn appended_review_is_read_back(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        persist_records_to_sqlite(&path, &sample_records(stamp())).expect("persist records");
        let review = Review::submit("marina-r4", "marina", 5, stamp())
            .expect("valid review")
            .tagged("well lit");

        append_review_to_sqlite(&path, &review).expect("append review");

        let store = SqlitePlaceStore::open(path.as_std_path()).expect("open store");
        let reviews = store.fetch_reviews(&PlaceId::new("marina"), 10);
        assert_eq!(reviews.len(), 4);
        assert!(reviews.iter().any(|stored| *stored == review));
    }

    #[rstest]
    fn appending_to_unknown_place_fails(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        persist_records_to_sqlite(&path, &sample_records(stamp())).expect("persist records");
        let review = Review::submit("r", "atlantis", 3, stamp()).expect("valid review");

        let err = append_review_to_sqlite(&path, &review).expect_err("unknown place");
        assert!(
            matches!(err, AppendReviewError::UnknownPlace { ref place_id } if place_id.as_str() == "atlantis")
        );
        assert_eq!(count(&path, "reviews"), 3);
    }

    #[rstest]
    fn appending_invalid_rating_fails(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "places.db");
        persist_records_to_sqlite(&path, &sample_records(stamp())).expect("persist records");
        let mut review = Review::submit("r", "marina", 3, stamp()).expect("valid review");
        review.cleanliness_rating = Some(7);

        let err = append_review_to_sqlite(&path, &review).expect_err("bad rating");
        assert!(matches!(err, AppendReviewError::Invalid(_)));
        assert_eq!(count(&path, "reviews"), 3);
    }

    #[rstest]
    fn appending_to_missing_database_fails(temp_dir: TempDir) {
        let path = db_path(&temp_dir, "absent.db");
        let review = Review::submit("r", "marina", 3, stamp()).expect("valid review");

        let err = append_review_to_sqlite(&path, &review).expect_err("missing database");
        assert!(matches!(err, AppendReviewError::Open { .. }));
        assert!(!path.exists(), "append must not create a database");
    }

    #[test]
    fn summary_counts_empty_input() {
        assert_eq!(IngestSummary::from_records(&[]), IngestSummary::default());
    }
}
