//! Session orchestration: starting flows, the 1 Hz timer, and the single
//! grading-plus-persistence submission routine all triggers converge on.

use std::sync::Arc;

use portal_core::Clock;
use portal_core::catalog::Catalog;
use portal_core::grading;
use portal_core::model::{ExamId, ExamRecord, ExamStats, RecordId, WeeklyExam};
use rand::Rng;
use storage::HistoryLedger;

use crate::error::SessionError;
use crate::sessions::selection::{self, PracticeConfig};
use crate::sessions::session::{AssessmentSession, SessionMode};

/// Delay before the post-exam redirect to the history view, in milliseconds.
pub const REDIRECT_DELAY_MS: u64 = 1500;

/// What caused a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTrigger {
    /// Explicit learner action.
    Manual,
    /// The exam timer reached zero.
    Timeout,
    /// The learner confirmed leaving an in-progress exam.
    Navigation,
}

impl SubmissionTrigger {
    #[must_use]
    pub fn is_forced(self) -> bool {
        !matches!(self, Self::Manual)
    }
}

/// What the caller should do after a submission lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSubmit {
    /// Practice: stay in place and show per-question results and solutions.
    RevealSolutions,
    /// Exam: redirect to the history view after a short fixed delay.
    RedirectToHistory { delay_ms: u64 },
    /// Exam via confirmed leave: let the held navigation proceed.
    ResumeNavigation,
}

/// Result of the one-and-only submission for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub record_id: RecordId,
    pub score: u8,
    pub correct: usize,
    pub total: usize,
    pub forced: bool,
    pub follow_up: PostSubmit,
}

/// Orchestrates practice and exam sessions over the catalog and the history
/// ledger.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    catalog: Arc<Catalog>,
    ledger: HistoryLedger,
}

impl AssessmentService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, ledger: HistoryLedger) -> Self {
        Self {
            clock,
            catalog,
            ledger,
        }
    }

    /// Starts a practice session from the learner's topic/count selection.
    ///
    /// The sample is uniform-random without replacement, clamped to the
    /// matching pool size; re-invoking draws a fresh sample.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if nothing matches the selection.
    pub fn start_practice<R: Rng + ?Sized>(
        &self,
        config: &PracticeConfig,
        rng: &mut R,
    ) -> Result<AssessmentSession, SessionError> {
        let questions = selection::sample_questions(&self.catalog, config, rng);
        if questions.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        tracing::debug!(title = %config.title(), count = questions.len(), "practice session started");
        Ok(AssessmentSession::practice(
            config.title(),
            questions,
            self.clock.now(),
        ))
    }

    /// Starts a timed sitting for a weekly exam.
    ///
    /// The attempt cap is enforced here, at session start, from the ledger;
    /// a rejected start creates no session and mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExam` for an id outside the catalog,
    /// `AttemptLimitReached` at the cap, or a storage error from the ledger
    /// read.
    pub async fn start_exam(&self, exam_id: &ExamId) -> Result<AssessmentSession, SessionError> {
        let exam = self
            .catalog
            .weekly_exam(exam_id)
            .ok_or_else(|| SessionError::UnknownExam(exam_id.clone()))?;

        let attempts = self.ledger.attempts_for(exam_id).await?;
        if attempts >= WeeklyExam::ATTEMPT_LIMIT {
            return Err(SessionError::AttemptLimitReached {
                exam_id: exam_id.clone(),
                attempts,
                cap: WeeklyExam::ATTEMPT_LIMIT,
            });
        }

        tracing::debug!(exam_id = %exam_id, attempts, "exam sitting started");
        Ok(AssessmentSession::exam(
            exam_id.clone(),
            exam.title(),
            exam.paper(),
            self.clock.now(),
        ))
    }

    /// Applies one 1 Hz timer tick to an exam session, forcing submission
    /// when the timer reaches zero. At most one tick ever returns an
    /// outcome; ticks after completion are no-ops.
    ///
    /// # Errors
    ///
    /// Propagates submission failures; the session stays retryable.
    pub async fn tick(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<Option<SubmissionOutcome>, SessionError> {
        if session.tick_timer() {
            self.submit(session, SubmissionTrigger::Timeout).await
        } else {
            Ok(None)
        }
    }

    /// The learner confirmed leaving an in-progress exam: submit with
    /// `forced = true`, then let the navigation proceed.
    ///
    /// # Errors
    ///
    /// Propagates submission failures; the held navigation stays pending.
    pub async fn confirm_leave(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<Option<SubmissionOutcome>, SessionError> {
        self.submit(session, SubmissionTrigger::Navigation).await
    }

    /// Grades the session, persists its record, and completes it.
    ///
    /// Idempotent: the first trigger per session wins and every later or
    /// concurrent one gets `Ok(None)` without touching the ledger. On
    /// failure the session steps back to in-progress so the learner can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the record cannot be built or persisted.
    pub async fn submit(
        &self,
        session: &mut AssessmentSession,
        trigger: SubmissionTrigger,
    ) -> Result<Option<SubmissionOutcome>, SessionError> {
        if !session.begin_submission() {
            return Ok(None);
        }

        match self.grade_and_persist(session, trigger).await {
            Ok(outcome) => {
                session.complete_submission();
                tracing::info!(
                    record_id = %outcome.record_id,
                    score = outcome.score,
                    forced = outcome.forced,
                    "session submitted"
                );
                Ok(Some(outcome))
            }
            Err(err) => {
                session.abort_submission();
                tracing::warn!(error = %err, "submission failed; session stays in progress");
                Err(err)
            }
        }
    }

    async fn grade_and_persist(
        &self,
        session: &AssessmentSession,
        trigger: SubmissionTrigger,
    ) -> Result<SubmissionOutcome, SessionError> {
        let total = session.questions().len();
        let correct = grading::correct_count(session.questions(), session.answers());
        let score = grading::score_percent(correct, total);
        let now = self.clock.now();

        let (record, follow_up) = match session.mode() {
            SessionMode::Practice => {
                let record = ExamRecord::practice(
                    RecordId::generated("rec", now),
                    now,
                    session.title(),
                    score,
                    session.answers().clone(),
                    session.questions().to_vec(),
                )?;
                (record, PostSubmit::RevealSolutions)
            }
            SessionMode::Exam { exam_id, .. } => {
                let record = ExamRecord::exam(
                    RecordId::generated("exam", now),
                    exam_id.clone(),
                    now,
                    session.title(),
                    score,
                    session.answers().clone(),
                    session.questions().to_vec(),
                    ExamStats::synthetic(),
                )?;
                let follow_up = if trigger == SubmissionTrigger::Navigation {
                    PostSubmit::ResumeNavigation
                } else {
                    PostSubmit::RedirectToHistory {
                        delay_ms: REDIRECT_DELAY_MS,
                    }
                };
                (record, follow_up)
            }
        };

        let record_id = record.id().clone();
        self.ledger.append(record).await?;

        Ok(SubmissionOutcome {
            record_id,
            score,
            correct,
            total,
            forced: trigger.is_forced(),
            follow_up,
        })
    }
}
