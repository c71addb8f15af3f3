//! End-to-end weekly exam flow over the in-memory service bundle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use portal_core::model::{ExamId, RecordKind, WeeklyExam};
use portal_core::time::fixed_clock;
use services::{
    PortalServices, PostSubmit, SessionError, SessionPhase, SubmissionTrigger,
};
use storage::{BlobStore, InMemoryBlobStore, StorageError};

fn services() -> PortalServices {
    PortalServices::in_memory(fixed_clock()).unwrap()
}

/// Blob store whose next write can be made to fail once.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: InMemoryBlobStore,
    fail_next_put: Arc<AtomicBool>,
}

impl FlakyStore {
    fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.put(key, value).await
    }
}

fn exam_id() -> ExamId {
    ExamId::new("exam_w1").unwrap()
}

#[tokio::test]
async fn full_marks_when_every_answer_is_correct() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    for question in session.questions().to_vec() {
        session.set_answer(question.id().clone(), question.correct_answer());
    }

    let outcome = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.score, 100);
    assert_eq!(outcome.correct, outcome.total);
    assert!(!outcome.forced);
    assert_eq!(
        outcome.follow_up,
        PostSubmit::RedirectToHistory { delay_ms: 1500 }
    );
    assert_eq!(session.phase(), SessionPhase::Completed);

    let records = services.history().list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), &outcome.record_id);
    assert_eq!(records[0].kind(), RecordKind::Exam);
    assert!(records[0].global_stats().is_some());
}

#[tokio::test]
async fn attempt_cap_refuses_the_third_sitting() {
    let services = services();
    let id = exam_id();

    for _ in 0..WeeklyExam::ATTEMPT_LIMIT {
        let mut session = services.assessments().start_exam(&id).await.unwrap();
        services
            .assessments()
            .submit(&mut session, SubmissionTrigger::Manual)
            .await
            .unwrap();
    }

    assert_eq!(services.history().attempts_for(&id).await.unwrap(), 2);
    let err = services.assessments().start_exam(&id).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::AttemptLimitReached { attempts: 2, .. }
    ));

    // A different exam is unaffected.
    let other = ExamId::new("exam_w2").unwrap();
    assert!(services.assessments().start_exam(&other).await.is_ok());
}

#[tokio::test]
async fn unknown_exam_is_refused() {
    let services = services();
    let err = services
        .assessments()
        .start_exam(&ExamId::new("exam_w9").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UnknownExam(_)));
}

#[tokio::test]
async fn rapid_double_submission_persists_exactly_one_record() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    let first = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap();
    let second = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 1);
}

#[tokio::test]
async fn timer_expiry_forces_exactly_one_submission() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..(WeeklyExam::TIME_LIMIT_SECS + 5) {
        if let Some(outcome) = services.assessments().tick(&mut session).await.unwrap() {
            outcomes.push(outcome);
        }
    }

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].forced);
    assert_eq!(outcomes[0].score, 0);
    // Timer never goes negative and stops at zero.
    assert_eq!(session.remaining_secs(), Some(0));
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 1);
}

#[tokio::test]
async fn declining_the_leave_prompt_resumes_the_session() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    let question = session.questions()[0].clone();
    session.set_answer(question.id().clone(), "0");
    services.assessments().tick(&mut session).await.unwrap();
    let at_interception = session.remaining_secs().unwrap();

    assert!(session.request_leave());
    session.cancel_leave();

    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(session.answers().get(question.id()), Some("0"));
    assert!(session.remaining_secs().unwrap() <= at_interception);

    // Time keeps elapsing, nothing was persisted.
    services.assessments().tick(&mut session).await.unwrap();
    assert_eq!(session.remaining_secs(), Some(at_interception - 1));
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 0);
}

#[tokio::test]
async fn confirming_the_leave_prompt_forces_submission_and_resumes_navigation() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    assert!(session.request_leave());
    let outcome = services
        .assessments()
        .confirm_leave(&mut session)
        .await
        .unwrap()
        .unwrap();

    assert!(outcome.forced);
    assert_eq!(outcome.follow_up, PostSubmit::ResumeNavigation);
    assert_eq!(session.phase(), SessionPhase::Completed);
    // The guard is released: later navigation flows freely.
    assert!(!session.request_leave());
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 1);
}

#[tokio::test]
async fn failed_persist_leaves_the_session_retryable() {
    let store = FlakyStore::default();
    let services = PortalServices::with_store(Arc::new(store.clone()), fixed_clock()).unwrap();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    let question = session.questions()[0].clone();
    session.set_answer(question.id().clone(), question.correct_answer());

    store.fail_next_put();
    let err = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));

    // The in-flight guard is reset: the session is live again, answers kept,
    // nothing persisted.
    assert_eq!(session.phase(), SessionPhase::InProgress);
    assert_eq!(
        session.answers().get(question.id()),
        Some(question.correct_answer())
    );
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 0);

    // A retry claims the submission again and persists exactly one record.
    let outcome = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.phase(), SessionPhase::Completed);
    assert_eq!(outcome.correct, 1);
    assert_eq!(services.history().attempts_for(&exam_id()).await.unwrap(), 1);
}

#[tokio::test]
async fn partial_answers_score_by_rounded_percentage() {
    let services = services();
    let mut session = services.assessments().start_exam(&exam_id()).await.unwrap();

    // Answer 3 of 10 correctly.
    for question in session.questions()[..3].to_vec() {
        session.set_answer(question.id().clone(), question.correct_answer());
    }

    let outcome = services
        .assessments()
        .submit(&mut session, SubmissionTrigger::Manual)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome.correct, 3);
    assert_eq!(outcome.total, 10);
    assert_eq!(outcome.score, 30);

    let records = services.history().list().await.unwrap();
    assert_eq!(records[0].score(), 30);
    assert_eq!(records[0].questions().len(), 10);
}
