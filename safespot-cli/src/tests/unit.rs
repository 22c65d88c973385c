//! Focused unit tests covering configuration conversion and validation.

use super::helpers::{Workspace, write_utf8};
use super::*;
use crate::{
    ingest::{IngestArgs, IngestConfig},
    query::{QueryArgs, QueryConfig},
    report::{ReportArgs, ReportConfig},
    review::{ReviewArgs, ReviewConfig},
    source::PlaceSource,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use safespot_core::{PlaceId, ReviewError, SafetyContext, SortField, SortOrder, TimeOfDay};
use safespot_data::FixtureFormat;
use safespot_scorer::ReportOptions;

fn db_query() -> QueryArgs {
    QueryArgs {
        database: Some(Utf8PathBuf::from("places.db")),
        ..QueryArgs::default()
    }
}

fn expect_invalid(err: CliError, expected: &'static str) {
    match err {
        CliError::InvalidArgument { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn ingest_requires_input() {
    let err = IngestConfig::try_from(IngestArgs::default()).expect_err("missing input");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_INPUT);
            assert_eq!(env, ENV_INGEST_INPUT);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn ingest_defaults_format_and_database() {
    let config = IngestConfig::try_from(IngestArgs {
        input: Some(Utf8PathBuf::from("places.json")),
        ..IngestArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.format, FixtureFormat::Canonical);
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
}

#[rstest]
fn ingest_rejects_missing_input_file() {
    let workspace = Workspace::new();
    let config = IngestConfig {
        input: workspace.root().join("absent.json"),
        format: FixtureFormat::Legacy,
        database: workspace.root().join("out.db"),
    };
    let err = config.validate_sources().expect_err("missing input file");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_INPUT),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn sources_are_mutually_exclusive() {
    let err = PlaceSource::resolve(
        Some(Utf8PathBuf::from("a.db")),
        Some(Utf8PathBuf::from("b.json")),
        None,
        ENV_QUERY_DATABASE,
    )
    .expect_err("conflicting sources");
    assert!(matches!(err, CliError::ConflictingSources { .. }));
}

#[rstest]
fn a_source_is_required() {
    let err = QueryConfig::try_from(QueryArgs::default()).expect_err("no source");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(env, ENV_QUERY_DATABASE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn fixture_sources_default_to_canonical() {
    let source = PlaceSource::resolve(
        None,
        Some(Utf8PathBuf::from("places.json")),
        None,
        ENV_QUERY_DATABASE,
    )
    .expect("fixture source");
    assert_eq!(
        source,
        PlaceSource::Fixture {
            path: Utf8PathBuf::from("places.json"),
            format: FixtureFormat::Canonical,
        }
    );
}

#[rstest]
fn directories_are_not_valid_sources() {
    let workspace = Workspace::new();
    let nested = workspace.root().join("nested");
    std::fs::create_dir(nested.as_std_path()).expect("create directory");
    let err = PlaceSource::Database(nested)
        .validate()
        .expect_err("directory rejected");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATABASE),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn query_maps_arguments_onto_place_query() {
    let config = QueryConfig::try_from(QueryArgs {
        lat: Some(13.05),
        lng: Some(80.28),
        radius_km: Some(5.0),
        min_score: Some(40.0),
        category: Some("beach".to_owned()),
        trending: Some(true),
        limit: Some(3),
        sort_by: Some(SortField::Distance),
        sort_order: Some(SortOrder::Asc),
        context: Some(SafetyContext::Night),
        ..db_query()
    })
    .expect("config should build");

    assert_eq!(config.source, PlaceSource::Database(Utf8PathBuf::from("places.db")));
    assert_eq!(config.query.lat, Some(13.05));
    assert_eq!(config.query.radius_km, Some(5.0));
    assert_eq!(config.query.min_safety_score, Some(40.0));
    assert_eq!(config.query.category.as_deref(), Some("beach"));
    assert!(config.query.trending);
    assert_eq!(config.query.limit, 3);
    assert_eq!(config.query.offset, 0);
    assert_eq!(config.query.sort_by, SortField::Distance);
    assert_eq!(config.query.sort_order, SortOrder::Asc);
    assert_eq!(config.context, Some(SafetyContext::Night));
}

#[rstest]
fn query_defaults_match_place_query() {
    let config = QueryConfig::try_from(db_query()).expect("config should build");
    assert_eq!(config.query, safespot_core::PlaceQuery::default());
    assert_eq!(config.search, None);
}

#[rstest]
#[case::latitude_alone(Some(10.0), None, None, ARG_LAT)]
#[case::longitude_alone(None, Some(10.0), None, ARG_LNG)]
#[case::latitude_out_of_range(Some(91.0), Some(0.0), None, ARG_LAT)]
#[case::longitude_out_of_range(Some(0.0), Some(-181.0), None, ARG_LNG)]
#[case::negative_radius(Some(0.0), Some(0.0), Some(-1.0), ARG_RADIUS)]
fn query_rejects_bad_geography(
    #[case] lat: Option<f64>,
    #[case] lng: Option<f64>,
    #[case] radius_km: Option<f64>,
    #[case] field: &'static str,
) {
    let err = QueryConfig::try_from(QueryArgs {
        lat,
        lng,
        radius_km,
        ..db_query()
    })
    .expect_err("invalid geography");
    expect_invalid(err, field);
}

#[rstest]
fn query_keeps_radius_without_centre() {
    let config = QueryConfig::try_from(QueryArgs {
        radius_km: Some(5.0),
        ..db_query()
    })
    .expect("radius alone is accepted");
    assert_eq!(config.query.radius_km, Some(5.0));
    assert_eq!(config.query.lat, None);
}

#[rstest]
fn query_rejects_inverted_score_bounds() {
    let err = QueryConfig::try_from(QueryArgs {
        min_score: Some(80.0),
        max_score: Some(20.0),
        ..db_query()
    })
    .expect_err("inverted bounds");
    expect_invalid(err, ARG_MIN_SCORE);
}

#[rstest]
fn report_requires_place() {
    let err = ReportConfig::try_from(ReportArgs {
        database: Some(Utf8PathBuf::from("places.db")),
        ..ReportArgs::default()
    })
    .expect_err("missing place");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_PLACE);
            assert_eq!(env, ENV_REPORT_PLACE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn report_uses_default_options() {
    let config = ReportConfig::try_from(ReportArgs {
        place: Some("marina".to_owned()),
        fixture: Some(Utf8PathBuf::from("legacy.json")),
        format: Some(FixtureFormat::Legacy),
        ..ReportArgs::default()
    })
    .expect("config should build");
    assert_eq!(config.place, PlaceId::new("marina"));
    assert_eq!(config.options, ReportOptions::default());
    assert_eq!(
        config.source,
        PlaceSource::Fixture {
            path: Utf8PathBuf::from("legacy.json"),
            format: FixtureFormat::Legacy,
        }
    );
}

#[rstest]
#[case(-0.1)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn report_rejects_bad_decay_constant(#[case] decay_constant: f64) {
    let err = ReportConfig::try_from(ReportArgs {
        place: Some("marina".to_owned()),
        database: Some(Utf8PathBuf::from("places.db")),
        decay_constant: Some(decay_constant),
        ..ReportArgs::default()
    })
    .expect_err("bad decay constant");
    expect_invalid(err, ARG_DECAY);
}

fn marina_review(rating: u8) -> ReviewArgs {
    ReviewArgs {
        place: Some("marina".to_owned()),
        rating: Some(rating),
        ..ReviewArgs::default()
    }
}

#[rstest]
#[case::place(ReviewArgs { rating: Some(3), ..ReviewArgs::default() }, ARG_PLACE, ENV_REVIEW_PLACE)]
#[case::rating(ReviewArgs { place: Some("marina".to_owned()), ..ReviewArgs::default() }, ARG_RATING, ENV_REVIEW_RATING)]
fn review_requires_place_and_rating(
    #[case] args: ReviewArgs,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let err = ReviewConfig::try_from(args).expect_err("missing argument");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn review_defaults_author_database_and_overall() {
    let now = safespot_core::test_support::stamp();
    let config = ReviewConfig::try_from(ReviewArgs {
        tags: Some("harassment, poorly lit,,".to_owned()),
        time_of_day: Some(TimeOfDay::Night),
        ..marina_review(2)
    })
    .expect("config should build");
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));

    let review = config.to_review(now).expect("valid review");
    assert_eq!(review.place_id, PlaceId::new("marina"));
    assert_eq!(review.user_id.as_deref(), Some("anonymous"));
    assert_eq!(review.overall_rating, Some(2));
    assert_eq!(review.tags, ["harassment", "poorly lit"]);
    assert_eq!(review.time_of_day, Some(TimeOfDay::Night));
    assert_eq!(review.created_at, now);
    assert_eq!(review.id, format!("marina-{}", now.timestamp_millis()));
}

#[rstest]
#[case::zero(0, false)]
#[case::lowest(1, true)]
#[case::highest(5, true)]
#[case::six(6, false)]
fn review_checks_safety_rating(#[case] rating: u8, #[case] accepted: bool) {
    let config = ReviewConfig::try_from(marina_review(rating)).expect("config should build");
    let result = config.to_review(safespot_core::test_support::stamp());
    match result {
        Ok(review) => {
            assert!(accepted, "rating {rating} should be rejected");
            assert_eq!(review.safety_rating, rating);
        }
        Err(CliError::InvalidReview(ReviewError::RatingOutOfRange { field, value })) => {
            assert!(!accepted, "rating {rating} should be accepted");
            assert_eq!(field, "safety");
            assert_eq!(value, rating);
        }
        Err(other) => panic!("expected InvalidReview, found {other:?}"),
    }
}

#[rstest]
fn review_rejects_out_of_range_overall() {
    let config = ReviewConfig::try_from(ReviewArgs {
        overall: Some(9),
        ..marina_review(4)
    })
    .expect("config should build");
    let err = config
        .to_review(safespot_core::test_support::stamp())
        .expect_err("overall out of range");
    assert!(matches!(
        err,
        CliError::InvalidReview(ReviewError::RatingOutOfRange { field: "overall", value: 9 })
    ));
}

#[rstest]
fn write_json_appends_newline() {
    let mut output = Vec::new();
    write_json(&mut output, &["a", "b"]).expect("write json");
    let text = String::from_utf8(output).expect("utf-8 output");
    assert!(text.ends_with("]\n"));
    assert!(text.contains("\"a\""));
}

#[rstest]
fn corrupt_fixture_reports_parse_error() {
    let workspace = Workspace::new();
    let path = workspace.root().join("broken.json");
    write_utf8(&path, b"{ not json");
    let err = PlaceSource::Fixture {
        path,
        format: FixtureFormat::Canonical,
    }
    .open(safespot_core::test_support::stamp())
    .err()
    .expect("corrupt fixture");
    assert!(matches!(
        err,
        CliError::Fixture(safespot_data::FixtureError::Parse { .. })
    ));
}
