use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::ids::{ExamId, QuestionId, RecordId};
use crate::model::question::Question;

/// Every session is scored out of 100.
pub const TOTAL_SCORE: u8 = 100;

//
// ─── ANSWER SHEET ──────────────────────────────────────────────────────────────
//

/// The learner's submitted answers, keyed by question id. Answers may be
/// revised freely until submission; insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<QuestionId, String>);

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or revises) the answer for a question.
    pub fn set(&mut self, question_id: QuestionId, answer: impl Into<String>) {
        self.0.insert(question_id, answer.into());
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.0.contains_key(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.0.iter().map(|(id, answer)| (id, answer.as_str()))
    }
}

//
// ─── COHORT STATS ──────────────────────────────────────────────────────────────
//

/// Cohort statistics attached to exam records at submission time.
///
/// `distribution` is a score-decile histogram: counts for 0-10, 10-20, …,
/// 90-100. Immutable once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamStats {
    pub top_mark: u8,
    pub avg_mark: u8,
    pub low_mark: u8,
    pub distribution: [u32; 10],
}

impl ExamStats {
    /// The synthetic cohort snapshot used while no real cohort backend exists.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            top_mark: 92,
            avg_mark: 68,
            low_mark: 42,
            distribution: [5, 8, 12, 15, 20, 25, 30, 22, 10, 5],
        }
    }
}

//
// ─── EXAM RECORD ───────────────────────────────────────────────────────────────
//

/// Which flow produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Practice,
    Exam,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("score {0} exceeds the total score of {TOTAL_SCORE}")]
    ScoreOutOfRange(u8),

    #[error("record cannot be built from an empty question snapshot")]
    NoQuestions,
}

/// The persisted, immutable outcome of a completed session.
///
/// `questions` is a value snapshot taken at session-start time; it must
/// survive later changes to the question pool. Records are created exactly
/// once at submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exam_id: Option<ExamId>,
    recorded_at: DateTime<Utc>,
    title: String,
    kind: RecordKind,
    score: u8,
    total_score: u8,
    answers: AnswerSheet,
    questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    global_stats: Option<ExamStats>,
}

impl ExamRecord {
    /// Builds the record for a completed practice session.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the score is above 100 or the snapshot is empty.
    pub fn practice(
        id: RecordId,
        recorded_at: DateTime<Utc>,
        title: impl Into<String>,
        score: u8,
        answers: AnswerSheet,
        questions: Vec<Question>,
    ) -> Result<Self, RecordError> {
        Self::build(id, None, recorded_at, title, RecordKind::Practice, score, answers, questions, None)
    }

    /// Builds the record for a completed weekly-exam session, linking it to
    /// the exam and attaching the cohort stats snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the score is above 100 or the snapshot is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn exam(
        id: RecordId,
        exam_id: ExamId,
        recorded_at: DateTime<Utc>,
        title: impl Into<String>,
        score: u8,
        answers: AnswerSheet,
        questions: Vec<Question>,
        global_stats: ExamStats,
    ) -> Result<Self, RecordError> {
        Self::build(
            id,
            Some(exam_id),
            recorded_at,
            title,
            RecordKind::Exam,
            score,
            answers,
            questions,
            Some(global_stats),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        id: RecordId,
        exam_id: Option<ExamId>,
        recorded_at: DateTime<Utc>,
        title: impl Into<String>,
        kind: RecordKind,
        score: u8,
        answers: AnswerSheet,
        questions: Vec<Question>,
        global_stats: Option<ExamStats>,
    ) -> Result<Self, RecordError> {
        if score > TOTAL_SCORE {
            return Err(RecordError::ScoreOutOfRange(score));
        }
        if questions.is_empty() {
            return Err(RecordError::NoQuestions);
        }

        Ok(Self {
            id,
            exam_id,
            recorded_at,
            title: title.into(),
            kind,
            score,
            total_score: TOTAL_SCORE,
            answers,
            questions,
            global_stats,
        })
    }

    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// The linked weekly exam; `None` for practice records.
    #[must_use]
    pub fn exam_id(&self) -> Option<&ExamId> {
        self.exam_id.as_ref()
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn total_score(&self) -> u8 {
        self.total_score
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// The question snapshot taken at session start.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Cohort stats; present only on exam records.
    #[must_use]
    pub fn global_stats(&self) -> Option<&ExamStats> {
        self.global_stats.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
