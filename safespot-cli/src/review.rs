//! `review` command: validate a user review and append it to SQLite.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safespot_core::{PlaceId, Review, TimeOfDay};
use safespot_data::{AppendReviewError, append_review_to_sqlite};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE, ARG_PLACE, ARG_RATING, CliError, DEFAULT_DATABASE, ENV_REVIEW_PLACE,
    ENV_REVIEW_RATING, source::require_existing, write_json,
};

/// Author recorded when none is given.
const ANONYMOUS_USER: &str = "anonymous";

/// CLI arguments for the `review` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Record a safety review for a place already stored in the \
                 SQLite database. Ratings run from 1 to 5; the overall \
                 rating defaults to the safety rating. The stored review \
                 is printed as JSON.",
    about = "Append a review to SQLite"
)]
#[ortho_config(prefix = "SAFESPOT")]
pub(crate) struct ReviewArgs {
    /// Identifier of the reviewed place.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) place: Option<String>,
    /// Safety rating from 1 to 5.
    #[arg(long = ARG_RATING, value_name = "1-5")]
    #[serde(default)]
    pub(crate) rating: Option<u8>,
    /// Cleanliness rating from 1 to 5.
    #[arg(long, value_name = "1-5")]
    #[serde(default)]
    pub(crate) cleanliness: Option<u8>,
    /// Police response rating from 1 to 5.
    #[arg(long, value_name = "1-5")]
    #[serde(default)]
    pub(crate) police_response: Option<u8>,
    /// Overall rating from 1 to 5 (defaults to the safety rating).
    #[arg(long, value_name = "1-5")]
    #[serde(default)]
    pub(crate) overall: Option<u8>,
    /// Free text comment.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) comment: Option<String>,
    /// Comma-separated tags such as `harassment,poorly lit`.
    #[arg(long, value_name = "tags")]
    #[serde(default)]
    pub(crate) tags: Option<String>,
    /// Part of the day the visit happened.
    #[arg(long, value_name = "bucket")]
    #[serde(default)]
    pub(crate) time_of_day: Option<TimeOfDay>,
    /// Author of the review (defaults to `anonymous`).
    #[arg(long, value_name = "user")]
    #[serde(default)]
    pub(crate) user: Option<String>,
    /// Review identifier (defaults to one derived from the place and time).
    #[arg(long, value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Database holding the place (defaults to `safespot.db`).
    #[arg(long, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ReviewArgs {
    pub(crate) fn into_config(self) -> Result<ReviewConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReviewConfig::try_from(merged)
    }
}

/// Resolved `review` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReviewConfig {
    pub(crate) place: PlaceId,
    pub(crate) rating: u8,
    pub(crate) cleanliness: Option<u8>,
    pub(crate) police_response: Option<u8>,
    pub(crate) overall: Option<u8>,
    pub(crate) comment: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) time_of_day: Option<TimeOfDay>,
    pub(crate) user: String,
    pub(crate) id: Option<String>,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ReviewArgs> for ReviewConfig {
    type Error = CliError;

    fn try_from(args: ReviewArgs) -> Result<Self, Self::Error> {
        let place = args.place.ok_or(CliError::MissingArgument {
            field: ARG_PLACE,
            env: ENV_REVIEW_PLACE,
        })?;
        let rating = args.rating.ok_or(CliError::MissingArgument {
            field: ARG_RATING,
            env: ENV_REVIEW_RATING,
        })?;
        let tags = args
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            place: PlaceId::new(place),
            rating,
            cleanliness: args.cleanliness,
            police_response: args.police_response,
            overall: args.overall,
            comment: args.comment.filter(|text| !text.trim().is_empty()),
            tags,
            time_of_day: args.time_of_day,
            user: args.user.unwrap_or_else(|| ANONYMOUS_USER.to_owned()),
            id: args.id,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

impl ReviewConfig {
    /// Build the review stamped with `now`, rejecting out-of-range ratings.
    pub(crate) fn to_review(&self, now: DateTime<Utc>) -> Result<Review, CliError> {
        let id = self
            .id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.place, now.timestamp_millis()));
        let mut review = Review::submit(id, self.place.clone(), self.rating, now)?;
        review.user_id = Some(self.user.clone());
        review.cleanliness_rating = self.cleanliness;
        review.police_response_rating = self.police_response;
        if self.overall.is_some() {
            review.overall_rating = self.overall;
        }
        review.review_text.clone_from(&self.comment);
        review.tags.clone_from(&self.tags);
        review.time_of_day = self.time_of_day;
        review.validate()?;
        Ok(review)
    }
}

pub(crate) fn run_review_with(
    args: ReviewArgs,
    writer: &mut dyn Write,
    now: DateTime<Utc>,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let review = execute_review(&config, now)?;
    write_json(writer, &review)
}

pub(crate) fn execute_review(
    config: &ReviewConfig,
    now: DateTime<Utc>,
) -> Result<Review, CliError> {
    let review = config.to_review(now)?;
    require_existing(&config.database, ARG_DATABASE)?;
    match append_review_to_sqlite(&config.database, &review) {
        Ok(()) => Ok(review),
        Err(AppendReviewError::UnknownPlace { place_id }) => {
            Err(CliError::PlaceNotFound { id: place_id })
        }
        Err(source) => Err(CliError::AppendReview {
            path: config.database.clone(),
            source,
        }),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ReviewConfig, CliError> {
    let merged = ReviewArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ReviewConfig::try_from(merged)
}
