//! `query` command: filter, sort and page places from a source.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safespot_core::{
    PlaceQuery, PlaceStore, RankedPlace, SafetyAttributes, SafetyContext, SafetyTier, SortField,
    SortOrder, query_places, search_by_name,
};
use safespot_data::FixtureFormat;
use safespot_scorer::context_score;
use serde::{Deserialize, Serialize};

use crate::{
    ARG_LAT, ARG_LNG, ARG_MAX_SCORE, ARG_MIN_SCORE, ARG_RADIUS, CliError, ENV_QUERY_DATABASE,
    source::PlaceSource, write_json,
};

/// Reviews consulted when computing a context score.
const CONTEXT_REVIEW_LIMIT: usize = 50;

/// CLI arguments for the `query` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank places from a SQLite database or a JSON fixture. \
                 Filters apply first, then distance from the optional \
                 centre, the radius, the sort and finally pagination. \
                 A radius only filters when --lat and --lng are given.",
    about = "Filter and rank places"
)]
#[ortho_config(prefix = "SAFESPOT")]
pub(crate) struct QueryArgs {
    /// SQLite database written by `ingest`.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// JSON fixture to read instead of a database.
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) fixture: Option<Utf8PathBuf>,
    /// Fixture shape: `canonical` or `legacy`.
    #[arg(long, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<FixtureFormat>,
    /// Latitude of the search centre.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre.
    #[arg(long = ARG_LNG, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Maximum distance from the centre.
    #[arg(long = ARG_RADIUS, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Inclusive lower bound on the safety score.
    #[arg(long = ARG_MIN_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) min_score: Option<f64>,
    /// Inclusive upper bound on the safety score.
    #[arg(long = ARG_MAX_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) max_score: Option<f64>,
    /// Exact category such as `beach`.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Locality substring.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) locality: Option<String>,
    /// Case-insensitive name substring applied before the query.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) search: Option<String>,
    /// Keep only trending places.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "bool")]
    #[serde(default)]
    pub(crate) trending: Option<bool>,
    /// Page size.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Results to skip.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) offset: Option<usize>,
    /// Sort field such as `safety_score` or `distance`.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) sort_by: Option<SortField>,
    /// `asc` or `desc`.
    #[arg(long, value_name = "order")]
    #[serde(default)]
    pub(crate) sort_order: Option<SortOrder>,
    /// Also report the score for this context.
    #[arg(long, value_name = "context")]
    #[serde(default)]
    pub(crate) context: Option<SafetyContext>,
}

impl QueryArgs {
    pub(crate) fn into_config(self) -> Result<QueryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        QueryConfig::try_from(merged)
    }
}

/// Resolved `query` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QueryConfig {
    pub(crate) source: PlaceSource,
    pub(crate) query: PlaceQuery,
    pub(crate) search: Option<String>,
    pub(crate) context: Option<SafetyContext>,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> CliError {
    CliError::InvalidArgument {
        field,
        reason: reason.into(),
    }
}

fn check_range(field: &'static str, value: Option<f64>, bound: f64) -> Result<(), CliError> {
    match value {
        Some(v) if !(-bound..=bound).contains(&v) => {
            Err(invalid(field, format!("{v} is outside [-{bound}, {bound}]")))
        }
        _ => Ok(()),
    }
}

impl TryFrom<QueryArgs> for QueryConfig {
    type Error = CliError;

    fn try_from(args: QueryArgs) -> Result<Self, Self::Error> {
        let source = PlaceSource::resolve(
            args.database,
            args.fixture,
            args.format,
            ENV_QUERY_DATABASE,
        )?;

        check_range(ARG_LAT, args.lat, 90.0)?;
        check_range(ARG_LNG, args.lng, 180.0)?;
        match (args.lat, args.lng) {
            (Some(_), None) => return Err(invalid(ARG_LAT, "requires --lng")),
            (None, Some(_)) => return Err(invalid(ARG_LNG, "requires --lat")),
            _ => {}
        }
        if let Some(radius) = args.radius_km
            && (radius.is_nan() || radius < 0.0)
        {
            return Err(invalid(ARG_RADIUS, format!("{radius} is negative")));
        }
        if let (Some(min), Some(max)) = (args.min_score, args.max_score)
            && min > max
        {
            return Err(invalid(
                ARG_MIN_SCORE,
                format!("{min} exceeds --{ARG_MAX_SCORE} {max}"),
            ));
        }

        let defaults = PlaceQuery::default();
        let query = PlaceQuery {
            lat: args.lat,
            lng: args.lng,
            radius_km: args.radius_km,
            min_safety_score: args.min_score,
            max_safety_score: args.max_score,
            category: args.category,
            locality: args.locality,
            trending: args.trending.unwrap_or(false),
            limit: args.limit.unwrap_or(defaults.limit),
            offset: args.offset.unwrap_or(defaults.offset),
            sort_by: args.sort_by.unwrap_or(defaults.sort_by),
            sort_order: args.sort_order.unwrap_or(defaults.sort_order),
        };

        Ok(Self {
            source,
            query,
            search: args.search,
            context: args.context,
        })
    }
}

/// One ranked place as printed by `query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct QueryHit {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) category: Option<String>,
    pub(crate) locality: Option<String>,
    pub(crate) distance_km: Option<f64>,
    pub(crate) safety_score: f64,
    pub(crate) safety_tier: SafetyTier,
    pub(crate) trend_score: f64,
    pub(crate) trending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) context: Option<SafetyContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) context_score: Option<f64>,
}

impl QueryHit {
    fn new(ranked: RankedPlace, context: Option<(SafetyContext, f64)>) -> Self {
        let distance_km = ranked.rounded_distance_km();
        let place = ranked.place;
        Self {
            safety_tier: SafetyTier::from_score(place.safety_score),
            trending: place.is_trending(),
            id: place.id.as_str().to_owned(),
            name: place.name,
            category: place.category,
            locality: place.locality,
            distance_km,
            safety_score: place.safety_score,
            trend_score: place.trend_score,
            context: context.map(|(ctx, _)| ctx),
            context_score: context.map(|(_, score)| score),
        }
    }
}

pub(crate) fn run_query_with(
    args: QueryArgs,
    writer: &mut dyn Write,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.source.validate()?;
    let store = config.source.open(now)?;
    let hits = execute_query(store.as_ref(), &config, now);
    write_json(writer, &hits)
}

/// Run the configured query against `store`.
pub(crate) fn execute_query<S>(store: &S, config: &QueryConfig, now: DateTime<Utc>) -> Vec<QueryHit>
where
    S: PlaceStore + ?Sized,
{
    let candidates = store.fetch_places(&config.query);
    let ranked = match &config.search {
        Some(needle) => query_places(search_by_name(candidates, needle), &config.query),
        None => query_places(candidates, &config.query),
    };
    ranked
        .into_iter()
        .map(|entry| {
            let context = config.context.map(|ctx| {
                let id = &entry.place.id;
                let attrs = store
                    .fetch_attributes(id)
                    .unwrap_or_else(|| SafetyAttributes::neutral(id.clone(), now));
                let reviews = store.fetch_reviews(id, CONTEXT_REVIEW_LIMIT);
                (ctx, context_score(ctx, &attrs, Some(&reviews)))
            });
            QueryHit::new(entry, context)
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<QueryConfig, CliError> {
    let merged = QueryArgs::merge_from_layers(layers).map_err(CliError::from)?;
    QueryConfig::try_from(merged)
}
