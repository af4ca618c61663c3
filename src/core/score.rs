//! Round scoring.
//!
//! Scoring is a pure function of the guess, the actual year and the streak
//! held before the round resolves. Points decay linearly with the year
//! difference; a streak multiplier applies while guesses stay within the
//! streak threshold.

use crate::settings::ScoringRules;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Streak multiplier applied to a round's base points.
///
/// Stored as tenths so totals are computed in integer arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub enum Multiplier {
    /// ×1.0
    #[default]
    Base,
    /// ×1.2, streak of two
    Warm,
    /// ×1.5, streak of three
    Hot,
    /// ×2.0, streak of four or more
    OnFire,
}

impl Multiplier {
    /// Multiplier earned by a round that keeps a streak of `streak` alive.
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0 | 1 => Self::Base,
            2 => Self::Warm,
            3 => Self::Hot,
            _ => Self::OnFire,
        }
    }

    pub fn tenths(self) -> u64 {
        match self {
            Self::Base => 10,
            Self::Warm => 12,
            Self::Hot => 15,
            Self::OnFire => 20,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.tenths() as f64 / 10.0
    }

    /// Whether the reveal should show a multiplier badge.
    pub fn is_boosted(self) -> bool {
        self != Self::Base
    }

    /// Apply to base points, rounding halves up.
    pub fn apply(self, base_points: u32) -> u32 {
        let scaled = (u64::from(base_points) * self.tenths() + 5) / 10;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "×{:.1}", self.as_f64())
    }
}

impl From<Multiplier> for f64 {
    fn from(multiplier: Multiplier) -> Self {
        multiplier.as_f64()
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        [Self::Base, Self::Warm, Self::Hot, Self::OnFire]
            .into_iter()
            .find(|m| (m.as_f64() - value).abs() < 1e-9)
            .ok_or_else(|| format!("{value} is not a streak multiplier"))
    }
}

/// Score breakdown for one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub base_points: u32,
    pub multiplier: Multiplier,
    pub total_points: u32,
    pub streak_broken: bool,
}

/// Score a guess against the actual year.
///
/// `current_streak` is the streak before this round resolves. Any integer
/// years are accepted; range checking is the caller's concern.
///
/// # Example
///
/// ```rust
/// use when_was_this::core::{calculate_score, Multiplier};
/// use when_was_this::settings::ScoringRules;
///
/// let result = calculate_score(1955, 1950, 3, &ScoringRules::default());
/// assert_eq!(result.base_points, 4500);
/// assert_eq!(result.multiplier, Multiplier::Hot);
/// assert_eq!(result.total_points, 6750);
/// assert!(!result.streak_broken);
/// ```
pub fn calculate_score(
    guess: i32,
    actual: i32,
    current_streak: u32,
    rules: &ScoringRules,
) -> ScoreResult {
    let difference = year_difference(guess, actual);
    let penalty = difference.saturating_mul(u64::from(rules.penalty_per_year));
    let base_points = u64::from(rules.exact_year_bonus).saturating_sub(penalty) as u32;

    let streak_broken = difference > u64::from(rules.streak_threshold);

    let multiplier = if streak_broken {
        Multiplier::Base
    } else {
        Multiplier::for_streak(current_streak)
    };

    ScoreResult {
        base_points,
        multiplier,
        total_points: multiplier.apply(base_points),
        streak_broken,
    }
}

/// Absolute distance between two years.
pub fn year_difference(a: i32, b: i32) -> u64 {
    (i64::from(a) - i64::from(b)).unsigned_abs()
}

/// What the reveal overlay shows once a round resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundReveal {
    pub correct_year: i32,
    pub user_guess: i32,
    pub difference: u64,
    /// Within the streak threshold
    pub is_close: bool,
    pub points_earned: u32,
    pub multiplier: Multiplier,
    pub streak: u32,
}

impl RoundReveal {
    pub fn new(
        correct_year: i32,
        user_guess: i32,
        points_earned: u32,
        multiplier: Multiplier,
        streak: u32,
        rules: &ScoringRules,
    ) -> Self {
        let difference = year_difference(correct_year, user_guess);
        Self {
            correct_year,
            user_guess,
            difference,
            is_close: difference <= u64::from(rules.streak_threshold),
            points_earned,
            multiplier,
            streak,
        }
    }

    /// Badge text such as `×1.5`, only when a bonus applied.
    pub fn multiplier_badge(&self) -> Option<String> {
        self.multiplier
            .is_boosted()
            .then(|| self.multiplier.to_string())
    }
}
