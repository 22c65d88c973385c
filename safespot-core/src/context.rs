//! Use cases a safety score can be weighted for.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scoring context.
///
/// # Examples
/// ```
/// use safespot_core::SafetyContext;
///
/// let ctx: SafetyContext = "women".parse().unwrap();
/// assert_eq!(ctx, SafetyContext::Women);
/// assert_eq!(SafetyContext::default().to_string(), "general");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SafetyContext {
    /// Plain attribute score.
    #[default]
    General,
    /// Night travel.
    Night,
    /// Women travelling alone.
    Women,
    /// Tourists.
    Tourist,
    /// Crowded events.
    Crowd,
}

impl SafetyContext {
    /// Every context, in display order.
    pub const ALL: [Self; 5] = [
        Self::General,
        Self::Night,
        Self::Women,
        Self::Tourist,
        Self::Crowd,
    ];

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Night => "night",
            Self::Women => "women",
            Self::Tourist => "tourist",
            Self::Crowd => "crowd",
        }
    }
}

impl fmt::Display for SafetyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ctx| ctx.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown safety context: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SafetyContext::General)]
    #[case(SafetyContext::Night)]
    #[case(SafetyContext::Women)]
    #[case(SafetyContext::Tourist)]
    #[case(SafetyContext::Crowd)]
    fn display_parses_back(#[case] ctx: SafetyContext) {
        assert_eq!(ctx.to_string().parse::<SafetyContext>(), Ok(ctx));
    }

    #[test]
    fn parsing_ignores_case() {
        assert_eq!("NIGHT".parse::<SafetyContext>(), Ok(SafetyContext::Night));
    }

    #[test]
    fn rejects_unknown_context() {
        assert!("cycling".parse::<SafetyContext>().is_err());
    }
}
