//! `report` command: everything known about one place, scored.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safespot_core::PlaceId;
use safespot_data::FixtureFormat;
use safespot_scorer::{PlaceReport, ReportOptions, build_report};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DECAY, ARG_PLACE, CliError, ENV_REPORT_DATABASE, ENV_REPORT_PLACE, source::PlaceSource,
    write_json,
};

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the composite and time-adjusted score, context \
                 scores, trend analysis and review statistics for one \
                 place.",
    about = "Score a single place"
)]
#[ortho_config(prefix = "SAFESPOT")]
pub(crate) struct ReportArgs {
    /// Identifier of the place to report on.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) place: Option<String>,
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
    /// Decay constant per thirty-day month (defaults to 0.15).
    #[arg(long = ARG_DECAY, value_name = "lambda")]
    #[serde(default)]
    pub(crate) decay_constant: Option<f64>,
    /// Maximum number of reviews included, newest first.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) review_limit: Option<usize>,
}

impl ReportArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReportConfig::try_from(merged)
    }
}

/// Resolved `report` configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportConfig {
    pub(crate) place: PlaceId,
    pub(crate) source: PlaceSource,
    pub(crate) options: ReportOptions,
}

impl TryFrom<ReportArgs> for ReportConfig {
    type Error = CliError;

    fn try_from(args: ReportArgs) -> Result<Self, Self::Error> {
        let place = args.place.ok_or(CliError::MissingArgument {
            field: ARG_PLACE,
            env: ENV_REPORT_PLACE,
        })?;
        let source = PlaceSource::resolve(
            args.database,
            args.fixture,
            args.format,
            ENV_REPORT_DATABASE,
        )?;

        let defaults = ReportOptions::default();
        let decay_constant = args.decay_constant.unwrap_or(defaults.decay_constant);
        if !decay_constant.is_finite() || decay_constant < 0.0 {
            return Err(CliError::InvalidArgument {
                field: ARG_DECAY,
                reason: format!("{decay_constant} must be a non-negative number"),
            });
        }

        Ok(Self {
            place: PlaceId::new(place),
            source,
            options: ReportOptions {
                decay_constant,
                review_limit: args.review_limit.unwrap_or(defaults.review_limit),
            },
        })
    }
}

pub(crate) fn run_report_with(
    args: ReportArgs,
    writer: &mut dyn Write,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_report(&config, now)?;
    write_json(writer, &report)
}

pub(crate) fn execute_report(
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> Result<PlaceReport, CliError> {
    config.source.validate()?;
    let store = config.source.open(now)?;
    build_report(store.as_ref(), &config.place, &config.options, now).ok_or_else(|| {
        CliError::PlaceNotFound {
            id: config.place.clone(),
        }
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReportConfig, CliError> {
    let merged = ReportArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReportConfig::try_from(merged)
}
