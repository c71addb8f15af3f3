//! Daily reward challenge: one standalone question per calendar day, graded
//! by the shared trimmed-equality rule, feeding the stats singleton.

use std::sync::Arc;

use portal_core::Clock;
use portal_core::catalog::{Catalog, DailyQuestion};
use portal_core::model::UserStats;
use storage::StatsStore;

use crate::error::ChallengeError;

/// What the reward page shows before an answer is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeStatus {
    pub completed_today: bool,
    pub stats: UserStats,
}

/// Result of submitting the daily answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeOutcome {
    pub correct: bool,
    /// False when today's challenge was already completed; stats unchanged.
    pub applied: bool,
    pub stats: UserStats,
}

#[derive(Clone)]
pub struct DailyChallengeService {
    clock: Clock,
    catalog: Arc<Catalog>,
    stats: StatsStore,
}

impl DailyChallengeService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, stats: StatsStore) -> Self {
        Self {
            clock,
            catalog,
            stats,
        }
    }

    #[must_use]
    pub fn question(&self) -> &DailyQuestion {
        self.catalog.daily_challenge()
    }

    /// Loads the stats and whether today's challenge is already done.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` for stats backend failures.
    pub async fn status(&self) -> Result<ChallengeStatus, ChallengeError> {
        let stats = self.stats.load().await?;
        let completed_today = stats.last_daily_challenge() == Some(self.clock.today());
        Ok(ChallengeStatus {
            completed_today,
            stats,
        })
    }

    /// Grades the submitted answer and applies the once-per-day stats
    /// transition: streak always extends, points only for a correct answer.
    /// Repeat submissions on the same day grade the answer but leave the
    /// stats untouched.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` if the stats cannot be loaded or saved.
    pub async fn complete(&self, answer: &str) -> Result<ChallengeOutcome, ChallengeError> {
        let correct = self.question().is_correct(answer);
        let mut stats = self.stats.load().await?;

        let applied = stats.complete_daily_challenge(correct, self.clock.today());
        if applied {
            self.stats.save(&stats).await?;
            tracing::info!(correct, streak = stats.streak(), "daily challenge completed");
        }

        Ok(ChallengeOutcome {
            correct,
            applied,
            stats,
        })
    }
}
