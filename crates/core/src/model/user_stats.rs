use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Points awarded for a correct daily-challenge answer.
pub const DAILY_CHALLENGE_POINTS: u32 = 100;

/// Process-wide learner stats singleton, persisted as one blob.
///
/// Mutated only through [`UserStats::complete_daily_challenge`], at most once
/// per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    streak: u32,
    points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_daily_challenge: Option<NaiveDate>,
}

impl UserStats {
    /// First-run stats written when no blob exists yet.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            streak: 12,
            points: 2450,
            last_daily_challenge: None,
        }
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn last_daily_challenge(&self) -> Option<NaiveDate> {
        self.last_daily_challenge
    }

    /// Applies the daily-challenge transition for `today`.
    ///
    /// Idempotent per calendar day: the first call of a day bumps the streak,
    /// awards points when the answer was correct, and stamps the day; repeat
    /// calls on the same day change nothing. Returns whether the transition
    /// was applied.
    pub fn complete_daily_challenge(&mut self, correct: bool, today: NaiveDate) -> bool {
        if self.last_daily_challenge == Some(today) {
            return false;
        }
        if correct {
            self.points += DAILY_CHALLENGE_POINTS;
        }
        self.streak += 1;
        self.last_daily_challenge = Some(today);
        true
    }
}

impl Default for UserStats {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn correct_answer_awards_points_and_streak() {
        let mut stats = UserStats::seed();
        let today = fixed_now().date_naive();

        assert!(stats.complete_daily_challenge(true, today));
        assert_eq!(stats.points(), 2450 + DAILY_CHALLENGE_POINTS);
        assert_eq!(stats.streak(), 13);
        assert_eq!(stats.last_daily_challenge(), Some(today));
    }

    #[test]
    fn incorrect_answer_still_extends_the_streak() {
        let mut stats = UserStats::seed();
        let today = fixed_now().date_naive();

        assert!(stats.complete_daily_challenge(false, today));
        assert_eq!(stats.points(), 2450);
        assert_eq!(stats.streak(), 13);
    }

    #[test]
    fn second_completion_on_same_day_is_a_no_op() {
        let mut stats = UserStats::seed();
        let today = fixed_now().date_naive();

        assert!(stats.complete_daily_challenge(true, today));
        assert!(!stats.complete_daily_challenge(true, today));
        assert_eq!(stats.points(), 2450 + DAILY_CHALLENGE_POINTS);
        assert_eq!(stats.streak(), 13);
    }

    #[test]
    fn next_day_applies_again() {
        let mut stats = UserStats::seed();
        let today = fixed_now().date_naive();

        assert!(stats.complete_daily_challenge(true, today));
        assert!(stats.complete_daily_challenge(true, today + Duration::days(1)));
        assert_eq!(stats.streak(), 14);
    }
}
