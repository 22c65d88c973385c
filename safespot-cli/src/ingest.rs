//! `ingest` command: load a fixture and persist it to SQLite.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safespot_data::{FixtureFormat, IngestSummary, load_fixture, persist_records_to_sqlite};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_INPUT, CliError, DEFAULT_DATABASE, ENV_INGEST_INPUT, source::require_existing, write_json,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON fixture in the canonical or legacy shape and \
                 persist it to the SQLite database read by `query` and \
                 `report`. Paths can come from CLI flags, configuration \
                 files, or environment variables.",
    about = "Persist a fixture file to SQLite"
)]
#[ortho_config(prefix = "SAFESPOT")]
pub(crate) struct IngestArgs {
    /// Fixture file to ingest.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Fixture shape: `canonical` or `legacy`.
    #[arg(long, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<FixtureFormat>,
    /// Destination database (defaults to `safespot.db`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) format: FixtureFormat,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INGEST_INPUT,
        })?;
        Ok(Self {
            input,
            format: args.format.unwrap_or_default(),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

impl IngestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)
    }
}

pub(crate) fn run_ingest_with(
    args: IngestArgs,
    writer: &mut dyn Write,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_ingest(&config, now)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_ingest(
    config: &IngestConfig,
    now: DateTime<Utc>,
) -> Result<IngestSummary, CliError> {
    config.validate_sources()?;
    let records = load_fixture(&config.input, config.format, now)?;
    persist_records_to_sqlite(&config.database, &records).map_err(|source| {
        CliError::PersistPlaces {
            path: config.database.clone(),
            source,
        }
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
