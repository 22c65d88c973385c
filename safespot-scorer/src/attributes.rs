//! Canonical attribute scorer.

use safespot_core::{SafetyAttributes, clamp_percent};

const VIOLENT_WEIGHT: f64 = 0.5;
const PROPERTY_WEIGHT: f64 = 0.3;
const ACCIDENT_WEIGHT: f64 = 0.2;

const CCTV_WEIGHT: f64 = 0.4;
const LIGHTING_WEIGHT: f64 = 0.35;
const POLICE_WEIGHT: f64 = 0.25;

const CRIME_SHARE: f64 = 0.6;
const INFRA_SHARE: f64 = 0.4;

/// Crime and infrastructure signals consumed by the attribute scorer.
///
/// Crime rates are on `[0, 100]` where lower is better; coverage values are
/// on `[0, 100]` where higher is better. Adapters for other data shapes
/// build this type rather than re-implementing the formula.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SafetySignals {
    /// Violent crime rate.
    pub violent_crime: f64,
    /// Property crime rate.
    pub property_crime: f64,
    /// Traffic accident rate.
    pub accident_rate: f64,
    /// CCTV coverage.
    pub cctv_coverage: f64,
    /// Street lighting quality.
    pub lighting_score: f64,
    /// Police presence.
    pub police_density: f64,
}

impl From<&SafetyAttributes> for SafetySignals {
    fn from(attrs: &SafetyAttributes) -> Self {
        Self {
            violent_crime: attrs.violent_crime,
            property_crime: attrs.property_crime,
            accident_rate: attrs.accident_rate,
            cctv_coverage: attrs.cctv_coverage,
            lighting_score: attrs.lighting_score,
            police_density: attrs.police_density,
        }
    }
}

/// Safety sub-score on `[0, 100]`.
///
/// `crime = 100 - (0.5 violent + 0.3 property + 0.2 accident)`,
/// `infra = 0.4 cctv + 0.35 lighting + 0.25 police`, and the result is
/// `0.6 crime + 0.4 infra` clamped to `[0, 100]`. `NaN` input propagates.
///
/// # Examples
/// ```
/// use safespot_scorer::{SafetySignals, safety_from_signals};
///
/// let perfect = SafetySignals {
///     cctv_coverage: 100.0,
///     lighting_score: 100.0,
///     police_density: 100.0,
///     ..SafetySignals::default()
/// };
/// assert_eq!(safety_from_signals(&perfect), 100.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted sum of signals")]
pub fn safety_from_signals(signals: &SafetySignals) -> f64 {
    let crime = 100.0
        - (VIOLENT_WEIGHT * signals.violent_crime
            + PROPERTY_WEIGHT * signals.property_crime
            + ACCIDENT_WEIGHT * signals.accident_rate);
    let infra = CCTV_WEIGHT * signals.cctv_coverage
        + LIGHTING_WEIGHT * signals.lighting_score
        + POLICE_WEIGHT * signals.police_density;
    clamp_percent(CRIME_SHARE * crime + INFRA_SHARE * infra)
}

/// [`safety_from_signals`] over a stored attribute snapshot.
#[must_use]
pub fn safety_from_attributes(attrs: &SafetyAttributes) -> f64 {
    safety_from_signals(&SafetySignals::from(attrs))
}
