//! Repeat-until-correct retry loop scoped to one weak topic tag.
//!
//! A mastery gate, not a quiz: there is no attempt ceiling and nothing is
//! persisted. The loop cycles through the tag's questions circularly until
//! one is answered correctly.

use portal_core::catalog::Catalog;
use portal_core::grading;
use portal_core::model::{Question, TopicTag};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::RemediationError;

/// Outcome of advancing the loop after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationStep {
    /// The last answer was correct; the loop is over.
    Mastered,
    /// Incorrect; a new question on the same tag is presented.
    Continue,
}

/// The retry sequence for one topic tag.
#[derive(Debug, Clone)]
pub struct RemediationLoop {
    tag: TopicTag,
    questions: Vec<Question>,
    index: usize,
    attempts: u32,
    last_correct: Option<bool>,
}

impl RemediationLoop {
    /// Filters the pool to `tag` and shuffles the retry sequence.
    ///
    /// # Errors
    ///
    /// Returns `RemediationError::NoQuestionsForTag` when the tag matches
    /// nothing, instead of constructing a loop that could never terminate.
    pub fn new<R: Rng + ?Sized>(
        catalog: &Catalog,
        tag: TopicTag,
        rng: &mut R,
    ) -> Result<Self, RemediationError> {
        let mut questions = catalog.questions_with_tag(&tag);
        if questions.is_empty() {
            return Err(RemediationError::NoQuestionsForTag(tag));
        }
        questions.shuffle(rng);

        Ok(Self {
            tag,
            questions,
            index: 0,
            attempts: 0,
            last_correct: None,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &TopicTag {
        &self.tag
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // Non-empty by construction.
        &self.questions[self.index]
    }

    /// Total submissions so far, across all questions in the loop.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the current question has a graded submission, and its result.
    #[must_use]
    pub fn last_correct(&self) -> Option<bool> {
        self.last_correct
    }

    /// Grades a submission for the current question. Re-submitting before
    /// advancing overwrites the previous result.
    pub fn submit(&mut self, answer: &str) -> bool {
        let correct = grading::grade(self.current_question(), answer);
        self.attempts += 1;
        self.last_correct = Some(correct);
        correct
    }

    /// Resolves the current submission: terminate on a correct answer, or
    /// advance circularly to the next question and reset submission state.
    ///
    /// # Errors
    ///
    /// Returns `RemediationError::NothingSubmitted` when called before
    /// [`RemediationLoop::submit`].
    pub fn advance(&mut self) -> Result<RemediationStep, RemediationError> {
        match self.last_correct.take() {
            None => Err(RemediationError::NothingSubmitted),
            Some(true) => Ok(RemediationStep::Mastered),
            Some(false) => {
                self.index = (self.index + 1) % self.questions.len();
                Ok(RemediationStep::Continue)
            }
        }
    }
}
