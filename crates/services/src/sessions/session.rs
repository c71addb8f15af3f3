//! The in-memory state of one question-answering session.
//!
//! Phase machine: `InProgress → Submitting → Completed`. `Submitting` exists
//! only to make submission idempotent: the first trigger wins the phase
//! transition and every concurrent trigger (manual click racing timer expiry
//! racing navigation interception) sees a non-`InProgress` phase and becomes
//! a no-op. A failed submission steps back to `InProgress` so the learner
//! can retry.

use chrono::{DateTime, Utc};
use portal_core::model::{AnswerSheet, ExamId, Question, QuestionId, WeeklyExam};

use crate::sessions::guard::NavigationGuard;

/// Which flow the session belongs to, with the exam-only timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Practice,
    Exam { exam_id: ExamId, remaining_secs: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Submitting,
    Completed,
}

/// Read-only progress view over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 0-based index of the question on screen.
    pub current: usize,
    pub total: usize,
    /// Distinct questions with an answer on the sheet.
    pub answered: usize,
    pub remaining_secs: Option<u32>,
}

/// One run of question-answering, practice or exam, from start to submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentSession {
    mode: SessionMode,
    phase: SessionPhase,
    title: String,
    questions: Vec<Question>,
    answers: AnswerSheet,
    current: usize,
    started_at: DateTime<Utc>,
    guard: NavigationGuard,
}

impl AssessmentSession {
    pub(crate) fn practice(
        title: impl Into<String>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode: SessionMode::Practice,
            phase: SessionPhase::InProgress,
            title: title.into(),
            questions,
            answers: AnswerSheet::new(),
            current: 0,
            started_at,
            guard: NavigationGuard::Inactive,
        }
    }

    pub(crate) fn exam(
        exam_id: ExamId,
        title: impl Into<String>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mode: SessionMode::Exam {
                exam_id,
                remaining_secs: WeeklyExam::TIME_LIMIT_SECS,
            },
            phase: SessionPhase::InProgress,
            title: title.into(),
            questions,
            answers: AnswerSheet::new(),
            current: 0,
            started_at,
            guard: NavigationGuard::armed(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_exam(&self) -> bool {
        matches!(self.mode, SessionMode::Exam { .. })
    }

    /// Linked weekly exam, when in exam mode.
    #[must_use]
    pub fn exam_id(&self) -> Option<&ExamId> {
        match &self.mode {
            SessionMode::Exam { exam_id, .. } => Some(exam_id),
            SessionMode::Practice => None,
        }
    }

    /// Seconds left on the exam timer; `None` for practice.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match &self.mode {
            SessionMode::Exam { remaining_secs, .. } => Some(*remaining_secs),
            SessionMode::Practice => None,
        }
    }

    /// Snapshot of where the learner stands, for progress chrome.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current,
            total: self.questions.len(),
            answered: self.answers.len(),
            remaining_secs: self.remaining_secs(),
        }
    }

    //
    // ─── QUESTION NAVIGATION ───────────────────────────────────────────────
    //

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // Sessions are never constructed over an empty snapshot.
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Moves to the next question; stays put on the last one. Prior answers
    /// are neither validated nor locked.
    pub fn next_question(&mut self) {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    pub fn previous_question(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jumps to the question at `index` (out-of-range jumps are ignored).
    pub fn jump_to(&mut self, index: usize) {
        if index < self.questions.len() {
            self.current = index;
        }
    }

    /// Records or revises an answer. Ignored once the session has left
    /// `InProgress`: a completed sheet is part of the persisted record.
    pub fn set_answer(&mut self, question_id: QuestionId, answer: impl Into<String>) {
        if self.phase == SessionPhase::InProgress {
            self.answers.set(question_id, answer);
        }
    }

    //
    // ─── TIMER ─────────────────────────────────────────────────────────────
    //

    /// Applies one 1 Hz timer tick. Returns true exactly when the timer
    /// reaches zero on this tick; the caller then forces submission. The
    /// timer is suspended outside `InProgress` and never goes negative.
    pub(crate) fn tick_timer(&mut self) -> bool {
        if self.phase != SessionPhase::InProgress {
            return false;
        }
        match &mut self.mode {
            SessionMode::Exam { remaining_secs, .. } if *remaining_secs > 0 => {
                *remaining_secs -= 1;
                *remaining_secs == 0
            }
            _ => false,
        }
    }

    //
    // ─── SUBMISSION PHASE GUARD ────────────────────────────────────────────
    //

    /// Claims the submission. Only the first caller per session gets true;
    /// everyone else is a no-op.
    pub(crate) fn begin_submission(&mut self) -> bool {
        if self.phase == SessionPhase::InProgress {
            self.phase = SessionPhase::Submitting;
            true
        } else {
            false
        }
    }

    /// Submission failed mid-flight: step back so a retry is possible.
    pub(crate) fn abort_submission(&mut self) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::InProgress;
        }
    }

    /// Submission persisted: finish the session and drop the navigation
    /// guard.
    pub(crate) fn complete_submission(&mut self) {
        self.phase = SessionPhase::Completed;
        self.guard.release();
    }

    //
    // ─── NAVIGATION GUARD ──────────────────────────────────────────────────
    //

    /// A navigation away from the session is attempted. Returns true if the
    /// guard held it (exam in progress); the caller must then resolve the
    /// prompt via confirm or [`AssessmentSession::cancel_leave`].
    pub fn request_leave(&mut self) -> bool {
        self.guard.intercept()
    }

    /// The learner declined the leave prompt: resume with answers and timer
    /// intact.
    pub fn cancel_leave(&mut self) {
        self.guard.reset();
    }

    #[must_use]
    pub fn leave_pending(&self) -> bool {
        self.guard.is_pending()
    }

    /// Teardown without submission (e.g. the surrounding view unmounts after
    /// completion). Releases the guard so no interception outlives the
    /// session.
    pub fn close(&mut self) {
        self.guard.release();
    }
}
