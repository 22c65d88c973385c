//! Command-line interface for the SafeSpot engine.
//!
//! Subcommands:
//! - `ingest` persists a canonical or legacy JSON fixture to SQLite.
//! - `query` filters, sorts and pages places from a database or fixture.
//! - `report` scores one place with its context, trend and review summary.
//! - `review` validates a user review and appends it to a database.
//!
//! Every subcommand writes pretty-printed JSON to standard output.
#![forbid(unsafe_code)]

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod ingest;
mod query;
mod report;
mod review;
mod source;

pub use error::CliError;

use ingest::{IngestArgs, run_ingest_with};
use query::{QueryArgs, run_query_with};
use report::{ReportArgs, run_report_with};
use review::{ReviewArgs, run_review_with};

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_FIXTURE: &str = "fixture";
pub(crate) const ARG_PLACE: &str = "place";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LNG: &str = "lng";
pub(crate) const ARG_RADIUS: &str = "radius-km";
pub(crate) const ARG_MIN_SCORE: &str = "min-score";
pub(crate) const ARG_MAX_SCORE: &str = "max-score";
pub(crate) const ARG_DECAY: &str = "decay-constant";
pub(crate) const ARG_RATING: &str = "rating";
pub(crate) const ENV_INGEST_INPUT: &str = "SAFESPOT_CMDS_INGEST_INPUT";
pub(crate) const ENV_QUERY_DATABASE: &str = "SAFESPOT_CMDS_QUERY_DATABASE";
pub(crate) const ENV_REPORT_DATABASE: &str = "SAFESPOT_CMDS_REPORT_DATABASE";
pub(crate) const ENV_REPORT_PLACE: &str = "SAFESPOT_CMDS_REPORT_PLACE";
pub(crate) const ENV_REVIEW_PLACE: &str = "SAFESPOT_CMDS_REVIEW_PLACE";
pub(crate) const ENV_REVIEW_RATING: &str = "SAFESPOT_CMDS_REVIEW_RATING";
pub(crate) const DEFAULT_DATABASE: &str = "safespot.db";

/// Run the SafeSpot CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when parsing, configuration, I/O or lookup fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout, Utc::now())
}

fn dispatch(command: Command, writer: &mut dyn Write, now: DateTime<Utc>) -> Result<(), CliError> {
    match command {
        Command::Ingest(args) => run_ingest_with(args, writer, now),
        Command::Query(args) => run_query_with(args, writer, now),
        Command::Report(args) => run_report_with(args, writer, now),
        Command::Review(args) => run_review_with(args, writer, now),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "safespot",
    about = "Safety scoring and ranking for places",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Persist a fixture file to the SQLite place store.
    Ingest(IngestArgs),
    /// Filter and rank places.
    Query(QueryArgs),
    /// Score a single place.
    Report(ReportArgs),
    /// Append a review to the SQLite place store.
    Review(ReviewArgs),
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
