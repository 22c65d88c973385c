//! Test helpers for building fixture files and running commands in memory.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use safespot_core::test_support::{sample_records, stamp};
use safespot_data::persist_records_to_sqlite;
use tempfile::TempDir;

pub(super) const LEGACY_FIXTURE: &str = r#"{
  "places": [
    {
      "id": "marina",
      "name": "Marina Beach",
      "lat": 13.05,
      "lng": 80.2824,
      "crime": { "violent": 20, "property": 30, "accident": 10 },
      "infra": { "cctv": 70, "lighting": 80, "policeDensity": 60 },
      "popularity": 90,
      "trend": 0.4,
      "reviews": [
        { "id": "m1", "rating": 4, "timestamp": "2024-06-10T19:30:00Z" }
      ]
    },
    { "id": "central", "name": "Chennai Central", "lat": 13.0827, "lng": 80.275 }
  ]
}"#;

/// Temporary directory holding a canonical fixture, a legacy fixture and a
/// SQLite database built from the canonical records.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let records = sample_records(stamp());
        let canonical = serde_json::to_string_pretty(&records).expect("serialise records");
        write_utf8(&root.join("canonical.json"), canonical.as_bytes());
        write_utf8(&root.join("legacy.json"), LEGACY_FIXTURE.as_bytes());
        persist_records_to_sqlite(&root.join("places.db"), &records).expect("persist records");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn canonical(&self) -> Utf8PathBuf {
        self.root.join("canonical.json")
    }

    pub(super) fn legacy(&self) -> Utf8PathBuf {
        self.root.join("legacy.json")
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("places.db")
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Parse `args` as a full invocation and run it against an in-memory writer.
pub(super) fn run_cli<I, S>(args: I) -> Result<serde_json::Value, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut invocation = vec!["safespot".to_owned()];
    invocation.extend(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    let mut output = Vec::new();
    dispatch(cli.command, &mut output, stamp())?;
    Ok(serde_json::from_slice(&output).expect("command output is JSON"))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn ids(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array output")
        .iter()
        .map(|hit| hit["id"].as_str().expect("string id").to_owned())
        .collect()
}
