use portal_core::catalog::CatalogError;
use portal_core::model::{ExamId, RecordError, TopicTag};
use storage::{SqliteInitError, StorageError};
use thiserror::Error;

/// Failures of the assessment session workflow.
///
/// Configuration errors (`AttemptLimitReached`, `UnknownExam`, `EmptyPool`)
/// refuse the operation without mutating anything; the caller surfaces them
/// to the learner. Persistence failures pass through from the ledger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("exam {exam_id} already has {attempts} recorded attempt(s); the cap is {cap}")]
    AttemptLimitReached {
        exam_id: ExamId,
        attempts: u32,
        cap: u32,
    },

    #[error("no weekly exam with id {0}")]
    UnknownExam(ExamId),

    #[error("no questions match the requested practice selection")]
    EmptyPool,

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the remediation loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemediationError {
    #[error("no questions carry topic tag {0}")]
    NoQuestionsForTag(TopicTag),

    #[error("no answer has been submitted for the current question")]
    NothingSubmitted,
}

/// Failures of the daily-challenge flow. Stats persistence is the only
/// fallible collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures while wiring up the service bundle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PortalInitError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
