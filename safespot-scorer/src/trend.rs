//! Trend analysis over monthly history.

use safespot_core::{SafetyHistory, TrendAnalysis, TrendDirection, clamp_percent, clamp_unit};

use crate::round_to;

/// Smoothing factor used by callers that have no preference.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

const STABLE_PERCENT: f64 = 5.0;
const DAYS_PER_MONTH: f64 = 30.0;
const VARIANCE_SCALE: f64 = 1000.0;
const CONFIDENCE_WINDOW: usize = 3;

/// Analyse the two most recent periods of `history`.
///
/// Returns `None` with fewer than two entries. Entries are ordered by month,
/// newest first, without mutating the input. A zero previous score reports
/// a change percentage of zero with the direction taken from the sign of
/// the change; otherwise changes under five percent are stable. Velocity is
/// change per thirty days between the two periods (zero when they share a
/// month) and the thirty day prediction is `current + velocity` clamped to
/// `[0, 100]`. Confidence is `1 - variance / 1000` over the latest three
/// scores, clamped to `[0, 1]`.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "trend statistics")]
#[expect(clippy::cast_precision_loss, reason = "day counts between months are small")]
pub fn analyze_trend(history: &[SafetyHistory]) -> Option<TrendAnalysis> {
    let mut sorted: Vec<&SafetyHistory> = history.iter().collect();
    sorted.sort_by(|a, b| b.month.cmp(&a.month));
    let (latest, earlier) = match sorted.as_slice() {
        [latest, earlier, ..] => (*latest, *earlier),
        _ => return None,
    };

    let current = latest.safety_score;
    let previous = earlier.safety_score;
    let change = current - previous;

    let (change_percentage, direction) = if previous == 0.0 {
        let direction = if change > 0.0 {
            TrendDirection::Improving
        } else if change < 0.0 {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };
        (0.0, direction)
    } else {
        let pct = change / previous * 100.0;
        let direction = if pct.abs() < STABLE_PERCENT {
            TrendDirection::Stable
        } else if change > 0.0 {
            TrendDirection::Improving
        } else {
            TrendDirection::Declining
        };
        (pct, direction)
    };

    let days = (latest.month - earlier.month).num_days();
    let velocity = if days == 0 {
        0.0
    } else {
        change / (days as f64 / DAYS_PER_MONTH)
    };

    let recent: Vec<f64> = sorted
        .iter()
        .take(CONFIDENCE_WINDOW)
        .map(|h| h.safety_score)
        .collect();
    let confidence = clamp_unit(1.0 - variance(&recent) / VARIANCE_SCALE);

    Some(TrendAnalysis {
        current_score: current,
        previous_score: previous,
        change: round_to(change, 1),
        change_percentage: round_to(change_percentage, 1),
        direction,
        velocity: round_to(velocity, 2),
        prediction_30_days: clamp_percent(round_to(current + velocity, 1)),
        confidence: round_to(confidence, 2),
    })
}

/// Population variance; zero for an empty slice.
#[expect(clippy::float_arithmetic, reason = "variance")]
#[expect(clippy::cast_precision_loss, reason = "sample sizes are tiny")]
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Exponentially smooth `series` with factor `alpha`.
///
/// The output has the same length as the input: `s[0] = x[0]` and
/// `s[i] = alpha * x[i] + (1 - alpha) * s[i - 1]`.
///
/// # Examples
/// ```
/// use safespot_scorer::exponential_smoothing;
///
/// let smoothed = exponential_smoothing(&[10.0, 20.0], 0.5);
/// assert_eq!(smoothed, vec![10.0, 15.0]);
/// assert!(exponential_smoothing(&[], 0.3).is_empty());
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "smoothing recurrence")]
pub fn exponential_smoothing(series: &[f64], alpha: f64) -> Vec<f64> {
    let mut smoothed = Vec::with_capacity(series.len());
    let mut last: Option<f64> = None;
    for &value in series {
        let next = last.map_or(value, |prev| alpha * value + (1.0 - alpha) * prev);
        smoothed.push(next);
        last = Some(next);
    }
    smoothed
}
