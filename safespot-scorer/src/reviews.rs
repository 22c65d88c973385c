//! Aggregate statistics over a place's reviews.

use chrono::{DateTime, Duration, Utc};
use safespot_core::Review;
use serde::{Deserialize, Serialize};

use crate::round_to;

const RECENT_DAYS: i64 = 30;

/// Summary of a review collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    /// Number of reviews.
    pub total: usize,
    /// Mean safety rating, one decimal.
    pub avg_safety_rating: f64,
    /// Mean cleanliness rating over reviews that carry one.
    pub avg_cleanliness_rating: f64,
    /// Mean police response rating over reviews that carry one.
    pub avg_police_response_rating: f64,
    /// Reviews created in the thirty days before `now`.
    pub recent_count: usize,
}

#[expect(clippy::float_arithmetic, reason = "mean of ratings")]
#[expect(
    clippy::cast_precision_loss,
    reason = "review counts are far below f64 precision"
)]
fn mean_rating<I>(ratings: I) -> f64
where
    I: Iterator<Item = u8>,
{
    let (sum, count) = ratings.fold((0.0, 0_usize), |(sum, count), rating| {
        (sum + f64::from(rating), count + 1)
    });
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 1)
    }
}

/// Summarise `reviews`. Averages are zero when no review carries the rating.
#[must_use]
pub fn review_stats(reviews: &[Review], now: DateTime<Utc>) -> ReviewStats {
    let cutoff = now - Duration::days(RECENT_DAYS);
    ReviewStats {
        total: reviews.len(),
        avg_safety_rating: mean_rating(reviews.iter().map(|r| r.safety_rating)),
        avg_cleanliness_rating: mean_rating(reviews.iter().filter_map(|r| r.cleanliness_rating)),
        avg_police_response_rating: mean_rating(
            reviews.iter().filter_map(|r| r.police_response_rating),
        ),
        recent_count: reviews.iter().filter(|r| r.created_at >= cutoff).count(),
    }
}
