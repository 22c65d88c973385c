//! User reviews and the time-of-day buckets they are tagged with.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PlaceId;

/// Part of the day a review describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TimeOfDay {
    /// Early hours until noon.
    Morning,
    /// Noon until early evening.
    Afternoon,
    /// Early evening.
    Evening,
    /// Night.
    Night,
    /// Small hours after midnight.
    LateNight,
}

impl TimeOfDay {
    /// Whether the bucket counts towards night-time safety.
    #[must_use]
    pub const fn is_night(self) -> bool {
        matches!(self, Self::Night | Self::LateNight)
    }

    /// Snake case label used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
            Self::LateNight => "late_night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            "late_night" | "late-night" => Ok(Self::LateNight),
            _ => Err(format!("unknown time of day: {s}")),
        }
    }
}

/// Inclusive range every rating must fall in.
pub const RATING_RANGE: RangeInclusive<u8> = 1..=5;

/// Reasons a submitted review is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// The review does not name a place.
    #[error("review must name a place")]
    MissingPlace,
    /// A rating lies outside [`RATING_RANGE`].
    #[error("{field} rating {value} must be between 1 and 5")]
    RatingOutOfRange {
        /// Which rating was rejected.
        field: &'static str,
        /// Rejected value.
        value: u8,
    },
}

fn check_rating(field: &'static str, value: Option<u8>) -> Result<(), ReviewError> {
    match value {
        Some(value) if !RATING_RANGE.contains(&value) => {
            Err(ReviewError::RatingOutOfRange { field, value })
        }
        _ => Ok(()),
    }
}

/// A single immutable rating event.
///
/// Ratings are integers on `[1, 5]`. Only `safety_rating` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Review {
    /// Review identifier.
    pub id: String,
    /// Reviewed place.
    pub place_id: PlaceId,
    /// Author, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub user_id: Option<String>,
    /// Perceived safety.
    pub safety_rating: u8,
    /// Perceived cleanliness.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cleanliness_rating: Option<u8>,
    /// Perceived police response.
    #[cfg_attr(feature = "serde", serde(default))]
    pub police_response_rating: Option<u8>,
    /// Overall impression.
    #[cfg_attr(feature = "serde", serde(default))]
    pub overall_rating: Option<u8>,
    /// Free text comment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub review_text: Option<String>,
    /// Free-form tags such as `harassment`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<String>,
    /// Part of the day the visit happened.
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_of_day: Option<TimeOfDay>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Minimal review with only a safety rating.
    pub fn new(
        id: impl Into<String>,
        place_id: impl Into<PlaceId>,
        safety_rating: u8,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            place_id: place_id.into(),
            user_id: None,
            safety_rating,
            cleanliness_rating: None,
            police_response_rating: None,
            overall_rating: None,
            review_text: None,
            tags: Vec::new(),
            time_of_day: None,
            created_at,
        }
    }

    /// Accept a new review from a user.
    ///
    /// The safety rating must lie in [`RATING_RANGE`]. The overall rating
    /// defaults to the safety rating and `created_at` records `now`.
    ///
    /// # Errors
    /// Returns [`ReviewError`] when the place id is empty or the safety
    /// rating is out of range.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use safespot_core::{Review, ReviewError};
    ///
    /// let review = Review::submit("r1", "marina", 4, Utc::now()).unwrap();
    /// assert_eq!(review.overall_rating, Some(4));
    /// assert!(matches!(
    ///     Review::submit("r2", "marina", 6, Utc::now()),
    ///     Err(ReviewError::RatingOutOfRange { value: 6, .. })
    /// ));
    /// ```
    pub fn submit(
        id: impl Into<String>,
        place_id: impl Into<PlaceId>,
        safety_rating: u8,
        now: DateTime<Utc>,
    ) -> Result<Self, ReviewError> {
        let mut review = Self::new(id, place_id, safety_rating, now);
        review.overall_rating = Some(safety_rating);
        review.validate()?;
        Ok(review)
    }

    /// Check the place id and every present rating.
    ///
    /// # Errors
    /// Returns the first [`ReviewError`] found.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.place_id.as_str().trim().is_empty() {
            return Err(ReviewError::MissingPlace);
        }
        check_rating("safety", Some(self.safety_rating))?;
        check_rating("cleanliness", self.cleanliness_rating)?;
        check_rating("police response", self.police_response_rating)?;
        check_rating("overall", self.overall_rating)
    }

    /// Set the time of day while returning `self` for chaining.
    #[must_use]
    pub const fn at(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    /// Append a tag while returning `self` for chaining.
    #[must_use]
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Exact tag membership.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
