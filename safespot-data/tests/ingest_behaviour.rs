//! Behavioural tests for loading fixtures and persisting them to SQLite.

use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use safespot_core::{PlaceId, PlaceQuery, PlaceStore, SqlitePlaceStore};
use safespot_data::{FixtureError, FixtureFormat, load_fixture, persist_records_to_sqlite};
use std::cell::RefCell;
use tempfile::TempDir;

struct Target {
    path: Utf8PathBuf,
    format: FixtureFormat,
}

struct Ingested {
    _dir: TempDir,
    database: Utf8PathBuf,
}

type Outcome = Result<Ingested, FixtureError>;

#[fixture]
fn target() -> RefCell<Option<Target>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> RefCell<Option<Outcome>> {
    RefCell::new(None)
}

fn fixture_path(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name.trim_matches('"'))
}

fn open_store(outcome: &RefCell<Option<Outcome>>) -> SqlitePlaceStore {
    let borrowed = outcome.borrow();
    let ingested = borrowed
        .as_ref()
        .expect("ingestion was attempted")
        .as_ref()
        .expect("expected successful ingestion");
    SqlitePlaceStore::open(ingested.database.as_std_path()).expect("open ingested database")
}

#[given("the legacy fixture {name}")]
fn legacy_fixture(name: String, #[from(target)] target: &RefCell<Option<Target>>) {
    *target.borrow_mut() = Some(Target {
        path: fixture_path(&name),
        format: FixtureFormat::Legacy,
    });
}

#[given("the canonical fixture {name}")]
fn canonical_fixture(name: String, #[from(target)] target: &RefCell<Option<Target>>) {
    *target.borrow_mut() = Some(Target {
        path: fixture_path(&name),
        format: FixtureFormat::Canonical,
    });
}

#[when("I ingest the fixture into a fresh database")]
fn ingest(
    #[from(target)] target: &RefCell<Option<Target>>,
    #[from(outcome)] outcome: &RefCell<Option<Outcome>>,
) {
    let now = Utc
        .with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
        .single()
        .expect("valid instant");
    let result = {
        let guard = target.borrow();
        let selected = guard.as_ref().expect("fixture selected");
        load_fixture(&selected.path, selected.format, now).map(|records| {
            let dir = TempDir::new().expect("create temp dir");
            let database = Utf8PathBuf::from_path_buf(dir.path().join("safespot.db"))
                .expect("utf-8 path");
            persist_records_to_sqlite(&database, &records).expect("persist records");
            Ingested { _dir: dir, database }
        })
    };
    *outcome.borrow_mut() = Some(result);
}

#[then("{count} places are stored")]
fn places_stored(count: usize, #[from(outcome)] outcome: &RefCell<Option<Outcome>>) {
    let store = open_store(outcome);
    assert_eq!(store.fetch_places(&PlaceQuery::default()).count(), count);
}

#[then("place {id} has safety score {safety} and trend score {trend}")]
fn place_scores(
    id: String,
    safety: f64,
    trend: f64,
    #[from(outcome)] outcome: &RefCell<Option<Outcome>>,
) {
    let store = open_store(outcome);
    let place = store
        .find_place(&PlaceId::new(id.trim_matches('"')))
        .expect("place stored");
    assert!((place.safety_score - safety).abs() < 1e-9);
    assert!((place.trend_score - trend).abs() < 1e-9);
}

#[then("place {id} has {count} reviews")]
fn place_reviews(
    id: String,
    count: usize,
    #[from(outcome)] outcome: &RefCell<Option<Outcome>>,
) {
    let store = open_store(outcome);
    let reviews = store.fetch_reviews(&PlaceId::new(id.trim_matches('"')), 10);
    assert_eq!(reviews.len(), count);
}

#[then("a read error is returned")]
fn read_error(#[from(outcome)] outcome: &RefCell<Option<Outcome>>) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("ingestion was attempted") {
        Err(FixtureError::Read { path, .. }) => {
            assert!(path.ends_with("missing.json"), "unexpected path {path}");
        }
        Err(other) => panic!("expected a read error, got {other:?}"),
        Ok(_) => panic!("expected a read error, got success"),
    }
}

#[then("a parse error is returned")]
fn parse_error(#[from(outcome)] outcome: &RefCell<Option<Outcome>>) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("ingestion was attempted") {
        Err(FixtureError::Parse { format, .. }) => {
            assert_eq!(*format, FixtureFormat::Canonical);
        }
        Err(other) => panic!("expected a parse error, got {other:?}"),
        Ok(_) => panic!("expected a parse error, got success"),
    }
}

#[scenario(path = "tests/features/ingest_fixture.feature", index = 0)]
fn ingesting_legacy_fixture(target: RefCell<Option<Target>>, outcome: RefCell<Option<Outcome>>) {
    let _ = (target, outcome);
}

#[scenario(path = "tests/features/ingest_fixture.feature", index = 1)]
fn reporting_missing_fixture(target: RefCell<Option<Target>>, outcome: RefCell<Option<Outcome>>) {
    let _ = (target, outcome);
}

#[scenario(path = "tests/features/ingest_fixture.feature", index = 2)]
fn rejecting_canonical_read(target: RefCell<Option<Target>>, outcome: RefCell<Option<Outcome>>) {
    let _ = (target, outcome);
}
