//! Monthly safety snapshots.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PlaceId;

/// One scored period for a place, keyed by the first day of its month.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafetyHistory {
    /// Place the snapshot belongs to.
    pub place_id: PlaceId,
    /// First day of the period.
    pub month: NaiveDate,
    /// Safety score recorded for the period.
    pub safety_score: f64,
    /// Crime index, when recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crime_index: Option<f64>,
    /// Infrastructure index, when recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub infra_index: Option<f64>,
    /// Average review score, when recorded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub review_score: Option<f64>,
    /// Violent incidents in the period.
    #[cfg_attr(feature = "serde", serde(default))]
    pub violent_incidents: u32,
    /// Property incidents in the period.
    #[cfg_attr(feature = "serde", serde(default))]
    pub property_incidents: u32,
    /// Accidents in the period.
    #[cfg_attr(feature = "serde", serde(default))]
    pub accident_incidents: u32,
}

impl SafetyHistory {
    /// Snapshot with only a score.
    pub fn new(place_id: impl Into<PlaceId>, month: NaiveDate, safety_score: f64) -> Self {
        Self {
            place_id: place_id.into(),
            month,
            safety_score,
            crime_index: None,
            infra_index: None,
            review_score: None,
            violent_incidents: 0,
            property_incidents: 0,
            accident_incidents: 0,
        }
    }
}
