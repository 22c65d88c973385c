//! Error types emitted by the SafeSpot CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use safespot_core::{PlaceId, ReviewError};
use safespot_data::{AppendReviewError, FixtureError, PersistPlacesError};
use thiserror::Error;

/// Errors emitted by the SafeSpot CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// An option was present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Flag name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Both a database and a fixture were supplied as the place source.
    #[error("--{first} and --{second} are mutually exclusive")]
    ConflictingSources {
        /// First flag.
        first: &'static str,
        /// Second flag.
        second: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag name.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Loading a fixture failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// Persisting records to SQLite failed.
    #[error("failed to persist places to {path:?}: {source}")]
    PersistPlaces {
        /// Destination database.
        path: Utf8PathBuf,
        /// Underlying persistence error.
        #[source]
        source: PersistPlacesError,
    },
    /// A submitted review failed validation.
    #[error(transparent)]
    InvalidReview(#[from] ReviewError),
    /// Appending a review to SQLite failed.
    #[error("failed to store review in {path:?}: {source}")]
    AppendReview {
        /// Destination database.
        path: Utf8PathBuf,
        /// Underlying persistence error.
        #[source]
        source: AppendReviewError,
    },
    /// Opening the SQLite place store failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenPlaceStore(#[from] safespot_core::SqlitePlaceStoreError),
    /// The requested place is not in the source.
    #[error("no place with id {id}")]
    PlaceNotFound {
        /// Requested identifier.
        id: PlaceId,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
