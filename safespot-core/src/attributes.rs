//! Raw per-place safety signals.

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PlaceId;

/// Authoritative signal snapshot for one place at one point in time.
///
/// Crime rates are on `[0, 100]` where lower is better. Infrastructure
/// coverage and the derived context scores are on `[0, 100]` where higher is
/// better. Values are not validated here; the scorer clamps its outputs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafetyAttributes {
    /// Place the snapshot belongs to.
    pub place_id: PlaceId,
    /// Violent crime rate.
    pub violent_crime: f64,
    /// Property crime rate.
    pub property_crime: f64,
    /// Traffic accident rate.
    pub accident_rate: f64,
    /// Aggregate infrastructure coverage.
    pub safety_infra: f64,
    /// Police presence.
    pub police_density: f64,
    /// CCTV coverage.
    pub cctv_coverage: f64,
    /// Street lighting quality.
    pub lighting_score: f64,
    /// Stored night-time score.
    pub night_safety_score: f64,
    /// Stored women's safety score.
    pub women_safety_score: f64,
    /// Stored tourist safety score.
    pub tourist_safety_score: f64,
    /// Externally maintained crowd safety signal.
    pub crowd_safety_score: f64,
    /// Pickpocketing risk.
    pub pickpocket_risk: f64,
    /// Confidence in the snapshot on `[0, 1]`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub confidence_score: Option<f64>,
    /// When the snapshot was taken.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data_timestamp: Option<DateTime<Utc>>,
    /// Provenance label such as `legacy-fixture`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data_source: Option<String>,
}

impl SafetyAttributes {
    /// Snapshot used when a source has no attributes for a place.
    ///
    /// Crime and pickpocket rates are zero, every coverage and context score
    /// is 50 and confidence is 0.5.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use safespot_core::SafetyAttributes;
    ///
    /// let attrs = SafetyAttributes::neutral("p1".into(), Utc::now());
    /// assert_eq!(attrs.violent_crime, 0.0);
    /// assert_eq!(attrs.lighting_score, 50.0);
    /// assert_eq!(attrs.confidence_score, Some(0.5));
    /// ```
    #[must_use]
    pub const fn neutral(place_id: PlaceId, now: DateTime<Utc>) -> Self {
        Self {
            place_id,
            violent_crime: 0.0,
            property_crime: 0.0,
            accident_rate: 0.0,
            safety_infra: 50.0,
            police_density: 50.0,
            cctv_coverage: 50.0,
            lighting_score: 50.0,
            night_safety_score: 50.0,
            women_safety_score: 50.0,
            tourist_safety_score: 50.0,
            crowd_safety_score: 50.0,
            pickpocket_risk: 0.0,
            confidence_score: Some(0.5),
            data_timestamp: Some(now),
            data_source: None,
        }
    }
}
