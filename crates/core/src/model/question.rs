use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{QuestionId, TopicTag};

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Answered by choosing one option; the stored answer is the stringified
    /// option index.
    SingleChoice,
    /// Answered by free text, compared by exact trimmed equality.
    FillInBlank,
}

/// A pool question. Content and solution may contain delimited math segments;
/// they are stored raw and rendered by an external collaborator.
///
/// Immutable once constructed. Invariants:
/// - `SingleChoice` has a non-empty option list and `correct_answer` is a
///   valid index into it (as a string).
/// - `FillInBlank` never has options.
/// - `difficulty` is in `1..=5` and at least one topic tag is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    content: String,
    options: Vec<String>,
    correct_answer: String,
    solution: String,
    tags: Vec<TopicTag>,
    difficulty: u8,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question content cannot be empty")]
    EmptyContent,

    #[error("single-choice question needs at least one option")]
    NoOptions,

    #[error("correct answer {answer:?} is not a valid option index (options: {options})")]
    InvalidOptionIndex { answer: String, options: usize },

    #[error("fill-in-blank question cannot carry options")]
    UnexpectedOptions,

    #[error("fill-in-blank answer cannot be empty")]
    EmptyAnswer,

    #[error("question needs at least one topic tag")]
    NoTags,

    #[error("difficulty {0} is out of range 1..=5")]
    DifficultyOutOfRange(u8),
}

impl Question {
    /// Builds a single-choice question; the correct answer is stored as the
    /// stringified option index.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any invariant is violated.
    pub fn single_choice(
        id: QuestionId,
        content: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        solution: impl Into<String>,
        tags: Vec<TopicTag>,
        difficulty: u8,
    ) -> Result<Self, QuestionError> {
        let content = content.into();
        validate_common(&content, &tags, difficulty)?;
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if correct_index >= options.len() {
            return Err(QuestionError::InvalidOptionIndex {
                answer: correct_index.to_string(),
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            kind: QuestionKind::SingleChoice,
            content,
            options,
            correct_answer: correct_index.to_string(),
            solution: solution.into(),
            tags,
            difficulty,
        })
    }

    /// Builds a fill-in-blank question with a free-text expected answer.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any invariant is violated.
    pub fn fill_in_blank(
        id: QuestionId,
        content: impl Into<String>,
        correct_answer: impl Into<String>,
        solution: impl Into<String>,
        tags: Vec<TopicTag>,
        difficulty: u8,
    ) -> Result<Self, QuestionError> {
        let content = content.into();
        let correct_answer = correct_answer.into();
        validate_common(&content, &tags, difficulty)?;
        if correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }

        Ok(Self {
            id,
            kind: QuestionKind::FillInBlank,
            content,
            options: Vec::new(),
            correct_answer,
            solution: solution.into(),
            tags,
            difficulty,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Option texts; empty for fill-in-blank questions.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The expected answer: an option index for single choice, free text
    /// otherwise.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    #[must_use]
    pub fn tags(&self) -> &[TopicTag] {
        &self.tags
    }

    /// The leading topic tag, used for weak-point bucketing.
    #[must_use]
    pub fn primary_tag(&self) -> &TopicTag {
        // Non-empty by construction.
        &self.tags[0]
    }

    #[must_use]
    pub fn has_tag(&self, tag: &TopicTag) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }
}

fn validate_common(content: &str, tags: &[TopicTag], difficulty: u8) -> Result<(), QuestionError> {
    if content.trim().is_empty() {
        return Err(QuestionError::EmptyContent);
    }
    if tags.is_empty() {
        return Err(QuestionError::NoTags);
    }
    if !(1..=5).contains(&difficulty) {
        return Err(QuestionError::DifficultyOutOfRange(difficulty));
    }
    Ok(())
}

//
// ─── PERSISTED SHAPE ───────────────────────────────────────────────────────────
//

/// Wire shape for a question inside a persisted record; re-validated on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawQuestion {
    id: QuestionId,
    kind: QuestionKind,
    content: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    solution: String,
    tags: Vec<TopicTag>,
    difficulty: u8,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        match raw.kind {
            QuestionKind::SingleChoice => {
                let index = raw
                    .correct_answer
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| QuestionError::InvalidOptionIndex {
                        answer: raw.correct_answer.clone(),
                        options: raw.options.len(),
                    })?;
                Question::single_choice(
                    raw.id,
                    raw.content,
                    raw.options,
                    index,
                    raw.solution,
                    raw.tags,
                    raw.difficulty,
                )
            }
            QuestionKind::FillInBlank => {
                if !raw.options.is_empty() {
                    return Err(QuestionError::UnexpectedOptions);
                }
                Question::fill_in_blank(
                    raw.id,
                    raw.content,
                    raw.correct_answer,
                    raw.solution,
                    raw.tags,
                    raw.difficulty,
                )
            }
        }
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            kind: q.kind,
            content: q.content,
            options: q.options,
            correct_answer: q.correct_answer,
            solution: q.solution,
            tags: q.tags,
            difficulty: q.difficulty,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
