//! Context-specific safety scores.

use safespot_core::{Review, SafetyAttributes, SafetyContext, clamp_percent};
use serde::{Deserialize, Serialize};

use crate::safety_from_attributes;

/// Review tags that signal a concern for women's safety.
pub const WOMEN_CONCERN_TAGS: [&str; 3] = ["unsafe for women", "harassment", "poorly lit"];

/// Number of concerning reviews tolerated before the women's score is cut.
const WOMEN_CONCERN_LIMIT: usize = 2;
const WOMEN_CONCERN_FACTOR: f64 = 0.7;
const NIGHT_REVIEW_WEIGHT: f64 = 0.2;

/// Night-time score on `[0, 100]`.
///
/// Lighting and police presence dominate. When reviews describing night or
/// late-night visits exist, their mean safety rating adds up to 20 points.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted sum of signals")]
pub fn night_safety_score(attrs: &SafetyAttributes, reviews: Option<&[Review]>) -> f64 {
    let infra =
        0.45 * attrs.lighting_score + 0.35 * attrs.police_density + 0.2 * attrs.cctv_coverage;
    let crime = 100.0 - (0.7 * attrs.violent_crime + 0.3 * attrs.property_crime);
    let boost = night_rating(reviews).map_or(0.0, |mean| mean / 5.0 * 100.0 * NIGHT_REVIEW_WEIGHT);
    clamp_percent(0.5 * infra + 0.3 * crime + boost)
}

#[expect(clippy::float_arithmetic, reason = "mean of ratings")]
#[expect(
    clippy::cast_precision_loss,
    reason = "review counts are far below f64 precision"
)]
fn night_rating(reviews: Option<&[Review]>) -> Option<f64> {
    let (sum, count) = reviews?
        .iter()
        .filter(|r| r.time_of_day.is_some_and(|t| t.is_night()))
        .fold((0.0, 0_usize), |(sum, count), r| {
            (sum + f64::from(r.safety_rating), count + 1)
        });
    (count > 0).then(|| sum / count as f64)
}

/// Women's safety score on `[0, 100]`.
///
/// More than two reviews tagged with any of [`WOMEN_CONCERN_TAGS`] scale
/// the combined score by 0.7.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted sum of signals")]
pub fn women_safety_score(attrs: &SafetyAttributes, reviews: Option<&[Review]>) -> f64 {
    let base = 100.0
        - (0.6 * attrs.violent_crime
            + 0.2 * attrs.property_crime
            + 0.2 * (100.0 - attrs.lighting_score));
    let support = 0.5 * attrs.police_density + 0.5 * attrs.cctv_coverage;
    let concerns = reviews.map_or(0, |reviews| {
        reviews
            .iter()
            .filter(|r| WOMEN_CONCERN_TAGS.iter().any(|tag| r.has_tag(tag)))
            .count()
    });
    let factor = if concerns > WOMEN_CONCERN_LIMIT {
        WOMEN_CONCERN_FACTOR
    } else {
        1.0
    };
    clamp_percent((0.6 * base + 0.4 * support) * factor)
}

/// Tourist safety score on `[0, 100]`, driven by pickpocketing risk.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use safespot_core::SafetyAttributes;
/// use safespot_scorer::tourist_safety_score;
///
/// let calm = SafetyAttributes::neutral("p".into(), Utc::now());
/// let busy = SafetyAttributes { pickpocket_risk: 80.0, ..calm.clone() };
/// assert!(tourist_safety_score(&busy) < tourist_safety_score(&calm));
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "weighted sum of signals")]
pub fn tourist_safety_score(attrs: &SafetyAttributes) -> f64 {
    let base = 100.0
        - (0.5 * attrs.pickpocket_risk + 0.3 * attrs.property_crime + 0.2 * attrs.violent_crime);
    let infra =
        0.4 * attrs.police_density + 0.3 * attrs.cctv_coverage + 0.3 * attrs.lighting_score;
    clamp_percent(0.7 * base + 0.3 * infra)
}

/// Score `attrs` for `context`.
///
/// `General` is the attribute score, `Crowd` passes the stored crowd signal
/// through unchanged and the remaining contexts use their dedicated
/// formulas.
#[must_use]
pub fn context_score(
    context: SafetyContext,
    attrs: &SafetyAttributes,
    reviews: Option<&[Review]>,
) -> f64 {
    match context {
        SafetyContext::General => safety_from_attributes(attrs),
        SafetyContext::Night => night_safety_score(attrs, reviews),
        SafetyContext::Women => women_safety_score(attrs, reviews),
        SafetyContext::Tourist => tourist_safety_score(attrs),
        SafetyContext::Crowd => attrs.crowd_safety_score,
    }
}

/// Every context score for one place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextScores {
    /// Attribute score.
    pub general: f64,
    /// Night-time score.
    pub night: f64,
    /// Women's safety score.
    pub women: f64,
    /// Tourist score.
    pub tourist: f64,
    /// Stored crowd signal.
    pub crowd: f64,
}

impl ContextScores {
    /// Score for one context.
    #[must_use]
    pub const fn get(&self, context: SafetyContext) -> f64 {
        match context {
            SafetyContext::General => self.general,
            SafetyContext::Night => self.night,
            SafetyContext::Women => self.women,
            SafetyContext::Tourist => self.tourist,
            SafetyContext::Crowd => self.crowd,
        }
    }
}

/// Compute [`context_score`] for every context at once.
#[must_use]
pub fn context_profile(attrs: &SafetyAttributes, reviews: Option<&[Review]>) -> ContextScores {
    let score = |context| context_score(context, attrs, reviews);
    ContextScores {
        general: score(SafetyContext::General),
        night: score(SafetyContext::Night),
        women: score(SafetyContext::Women),
        tourist: score(SafetyContext::Tourist),
        crowd: score(SafetyContext::Crowd),
    }
}
