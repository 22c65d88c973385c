//! JSON fixture loading.

use std::{fmt, io, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use safespot_core::PlaceRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{fs, legacy::LegacyFixture};

/// Shape of a fixture document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureFormat {
    /// Array of canonical place records.
    #[default]
    Canonical,
    /// `{ "places": [...] }` in the flat legacy shape.
    Legacy,
}

impl FixtureFormat {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for FixtureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixtureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canonical" => Ok(Self::Canonical),
            "legacy" => Ok(Self::Legacy),
            _ => Err(format!("unknown fixture format: {s}")),
        }
    }
}

/// Errors raised while loading a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixture {path}")]
    Read {
        /// Fixture path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The contents were not valid for the requested format.
    #[error("failed to parse {format} fixture {path}")]
    Parse {
        /// Fixture path.
        path: Utf8PathBuf,
        /// Format the file was parsed as.
        format: FixtureFormat,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Parse fixture text into canonical records.
///
/// Legacy entries are converted with `now` as their snapshot time. Records
/// whose coordinates fall outside WGS84 bounds are dropped with a warning.
///
/// # Errors
/// Returns the JSON error when `text` does not match `format`.
pub fn parse_fixture(
    text: &str,
    format: FixtureFormat,
    now: DateTime<Utc>,
) -> Result<Vec<PlaceRecord>, serde_json::Error> {
    let records: Vec<PlaceRecord> = match format {
        FixtureFormat::Canonical => serde_json::from_str(text)?,
        FixtureFormat::Legacy => serde_json::from_str::<LegacyFixture>(text)?
            .places
            .into_iter()
            .map(|place| place.into_record(now))
            .collect(),
    };
    Ok(records
        .into_iter()
        .filter(|record| match record.place.validate_location() {
            Ok(()) => true,
            Err(err) => {
                log::warn!("skipping fixture record: {err}");
                false
            }
        })
        .collect())
}

/// Read and parse the fixture at `path`.
///
/// # Errors
/// Returns [`FixtureError::Read`] when the file cannot be read and
/// [`FixtureError::Parse`] when it does not match `format`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use chrono::Utc;
/// use safespot_data::{FixtureFormat, load_fixture};
///
/// # fn main() -> Result<(), safespot_data::FixtureError> {
/// let records = load_fixture(Utf8Path::new("places.json"), FixtureFormat::Legacy, Utc::now())?;
/// assert!(records.iter().all(|r| r.attributes.is_some()));
/// # Ok(())
/// # }
/// ```
pub fn load_fixture(
    path: &Utf8Path,
    format: FixtureFormat,
    now: DateTime<Utc>,
) -> Result<Vec<PlaceRecord>, FixtureError> {
    let text = fs::read_to_string(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_fixture(&text, format, now).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        format,
        source,
    })?;
    log::debug!("loaded {} records from {path}", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use safespot_core::test_support::{sample_records, stamp};

    #[rstest]
    #[case("canonical", FixtureFormat::Canonical)]
    #[case("Legacy", FixtureFormat::Legacy)]
    fn parses_format_names(#[case] raw: &str, #[case] expected: FixtureFormat) {
        assert_eq!(raw.parse::<FixtureFormat>(), Ok(expected));
        assert_eq!(expected.to_string(), raw.to_ascii_lowercase());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("csv".parse::<FixtureFormat>().is_err());
    }

    #[test]
    fn reads_canonical_records() {
        let records = sample_records(stamp());
        let text = serde_json::to_string(&records).expect("serialise records");
        let parsed = parse_fixture(&text, FixtureFormat::Canonical, stamp()).expect("parse");
        assert_eq!(parsed.len(), records.len());
        for (read, written) in parsed.iter().zip(&records) {
            assert_eq!(read.place.id, written.place.id);
            assert_eq!(read.reviews, written.reviews);
            assert_eq!(read.history.len(), written.history.len());
            assert_eq!(read.attributes.is_some(), written.attributes.is_some());
        }
    }

    #[test]
    fn drops_out_of_range_places() {
        let text = r#"{ "places": [
            { "id": "ok", "name": "Fine", "lat": 10.0, "lng": 20.0 },
            { "id": "bad", "name": "Off the map", "lat": 95.0, "lng": 20.0 }
        ] }"#;
        let parsed = parse_fixture(text, FixtureFormat::Legacy, stamp()).expect("parse");
        let ids: Vec<_> = parsed.iter().map(|r| r.place.id.as_str()).collect();
        assert_eq!(ids, ["ok"]);
    }

    #[test]
    fn legacy_text_is_not_canonical() {
        let text = r#"{ "places": [] }"#;
        assert!(parse_fixture(text, FixtureFormat::Canonical, stamp()).is_err());
        assert!(
            parse_fixture(text, FixtureFormat::Legacy, stamp())
                .expect("parse")
                .is_empty()
        );
    }
}
