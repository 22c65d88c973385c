//! Selection of the place data source shared by `query` and `report`.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use safespot_core::{MemoryStore, PlaceStore};
use safespot_data::{FixtureFormat, load_fixture};

use crate::{ARG_DATABASE, ARG_FIXTURE, CliError};

/// Where places are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlaceSource {
    /// SQLite database written by `ingest`.
    Database(Utf8PathBuf),
    /// JSON fixture loaded into memory.
    Fixture {
        path: Utf8PathBuf,
        format: FixtureFormat,
    },
}

impl PlaceSource {
    /// Pick exactly one of `database` and `fixture`.
    pub(crate) fn resolve(
        database: Option<Utf8PathBuf>,
        fixture: Option<Utf8PathBuf>,
        format: Option<FixtureFormat>,
        env: &'static str,
    ) -> Result<Self, CliError> {
        match (database, fixture) {
            (Some(_), Some(_)) => Err(CliError::ConflictingSources {
                first: ARG_DATABASE,
                second: ARG_FIXTURE,
            }),
            (Some(path), None) => Ok(Self::Database(path)),
            (None, Some(path)) => Ok(Self::Fixture {
                path,
                format: format.unwrap_or_default(),
            }),
            (None, None) => Err(CliError::MissingArgument {
                field: ARG_DATABASE,
                env,
            }),
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Self::Database(_) => ARG_DATABASE,
            Self::Fixture { .. } => ARG_FIXTURE,
        }
    }

    fn path(&self) -> &Utf8Path {
        match self {
            Self::Database(path) | Self::Fixture { path, .. } => path,
        }
    }

    /// Fail early when the source path is not a readable file.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        require_existing(self.path(), self.field())
    }

    /// Open the source as a [`PlaceStore`].
    ///
    /// Fixtures are stamped with `now` when converted from the legacy shape.
    pub(crate) fn open(&self, now: DateTime<Utc>) -> Result<Box<dyn PlaceStore>, CliError> {
        log::debug!("reading places from {} {}", self.field(), self.path());
        match self {
            Self::Database(path) => open_database(path),
            Self::Fixture { path, format } => {
                let records = load_fixture(path, *format, now)?;
                Ok(Box::new(MemoryStore::from_records(records)))
            }
        }
    }
}

#[cfg(feature = "store-sqlite")]
fn open_database(path: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
    let store = safespot_core::SqlitePlaceStore::open(path.as_std_path())?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_database(_path: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "reading places from a database",
    })
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match safespot_data::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}
