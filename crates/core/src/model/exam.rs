use thiserror::Error;

use crate::model::ids::ExamId;
use crate::model::question::Question;

/// Catalog availability of a weekly exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStatus {
    Upcoming,
    Available,
    Completed,
    Missed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("weekly exam needs at least one question")]
    EmptyPaper,
}

/// A timed weekly assessment from the static catalog.
///
/// The attempt count is derived from the history ledger, never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyExam {
    id: ExamId,
    title: String,
    date_range: String,
    status: ExamStatus,
    questions: Vec<Question>,
}

impl WeeklyExam {
    /// Maximum number of records permitted per exam id.
    pub const ATTEMPT_LIMIT: u32 = 2;

    /// Number of questions served per sitting (first slice of the paper).
    pub const PAPER_SIZE: usize = 10;

    /// Fixed time budget per sitting: 45 minutes.
    pub const TIME_LIMIT_SECS: u32 = 45 * 60;

    /// # Errors
    ///
    /// Returns `ExamError::EmptyPaper` if no questions are supplied.
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        date_range: impl Into<String>,
        status: ExamStatus,
        questions: Vec<Question>,
    ) -> Result<Self, ExamError> {
        if questions.is_empty() {
            return Err(ExamError::EmptyPaper);
        }
        Ok(Self {
            id,
            title: title.into(),
            date_range: date_range.into(),
            status,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ExamId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn date_range(&self) -> &str {
        &self.date_range
    }

    #[must_use]
    pub fn status(&self) -> ExamStatus {
        self.status
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question snapshot served to a sitting: value copies of the first
    /// `PAPER_SIZE` questions, decoupled from later catalog changes.
    #[must_use]
    pub fn paper(&self) -> Vec<Question> {
        self.questions
            .iter()
            .take(Self::PAPER_SIZE)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, TopicTag};

    fn build_question(id: u32) -> Question {
        Question::fill_in_blank(
            QuestionId::new(format!("q{id}")).unwrap(),
            format!("Question {id}"),
            "1",
            "",
            vec![TopicTag::new("1-1").unwrap()],
            1,
        )
        .unwrap()
    }

    #[test]
    fn paper_is_capped_at_ten_questions() {
        let questions: Vec<_> = (1..=12).map(build_question).collect();
        let exam = WeeklyExam::new(
            ExamId::new("exam_w1").unwrap(),
            "Week 1",
            "2023/10/01 - 2023/10/07",
            ExamStatus::Available,
            questions,
        )
        .unwrap();

        assert_eq!(exam.paper().len(), WeeklyExam::PAPER_SIZE);
        assert_eq!(exam.questions().len(), 12);
    }

    #[test]
    fn short_paper_serves_what_exists() {
        let exam = WeeklyExam::new(
            ExamId::new("exam_w2").unwrap(),
            "Week 2",
            "2023/10/24 - 2023/10/31",
            ExamStatus::Available,
            vec![build_question(1), build_question(2)],
        )
        .unwrap();
        assert_eq!(exam.paper().len(), 2);
    }

    #[test]
    fn empty_paper_is_rejected() {
        let err = WeeklyExam::new(
            ExamId::new("exam_w3").unwrap(),
            "Week 3",
            "",
            ExamStatus::Upcoming,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, ExamError::EmptyPaper);
    }
}
