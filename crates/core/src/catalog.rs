//! Static content catalog: chapter tree, question pool, weekly exams, the
//! first-run history seed, and the daily-challenge question.
//!
//! The catalog is a read-only collaborator. Flows take value copies out of it
//! (session snapshots, remediation sequences) and never mutate it.

use thiserror::Error;

use crate::grading::answers_match;
use crate::model::{
    AnswerSheet, ExamError, ExamId, ExamRecord, ExamStatus, IdError, Question, QuestionError,
    QuestionId, RecordError, RecordId, TopicTag, WeeklyExam,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Exam(#[from] ExamError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("seed record timestamp is not representable")]
    InvalidSeedTimestamp,
}

/// A chapter in the video-lesson tree. Leaf chapters carry a video id for the
/// external player and a topic code matching question tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub video_id: Option<String>,
    pub sub_chapters: Vec<Chapter>,
}

/// The standalone daily-challenge question shown on the reward page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuestion {
    pub title: String,
    pub content: String,
    pub solution: String,
    answer: String,
}

impl DailyQuestion {
    /// Grades a submitted answer with the shared trimmed-equality rule.
    #[must_use]
    pub fn is_correct(&self, submitted: &str) -> bool {
        answers_match(submitted, &self.answer)
    }
}

/// Read-only bundle of all static content.
pub struct Catalog {
    chapters: Vec<Chapter>,
    pool: Vec<Question>,
    weekly_exams: Vec<WeeklyExam>,
    daily_challenge: DailyQuestion,
    seed_record: ExamRecord,
}

impl Catalog {
    /// Builds the built-in mock catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the built-in data violates a model
    /// invariant; with unmodified sources this does not happen.
    pub fn built_in() -> Result<Self, CatalogError> {
        let pool = built_in_pool()?;
        let weekly_exams = vec![
            WeeklyExam::new(
                ExamId::new("exam_w1")?,
                "Week 1: Numbers and Expressions Review",
                "2023/10/01 - 2023/10/07",
                ExamStatus::Available,
                pool.clone(),
            )?,
            WeeklyExam::new(
                ExamId::new("exam_w2")?,
                "Week 2: Polynomial Operations and Lines",
                "2023/10/24 - 2023/10/31",
                ExamStatus::Available,
                pool.clone(),
            )?,
        ];
        let seed_record = built_in_seed_record(&pool)?;

        Ok(Self {
            chapters: built_in_chapters(),
            pool,
            weekly_exams,
            daily_challenge: DailyQuestion {
                title: "Daily Challenge: Absolute Value Inequalities".into(),
                content: "How many integer solutions does $|2x-1| \\le 5$ have?".into(),
                solution: "$|2x-1| \\le 5$ gives $-5 \\le 2x-1 \\le 5$, so $-4 \\le 2x \\le 6$ \
                           and $-2 \\le x \\le 3$. The integers are $-2, -1, 0, 1, 2, 3$: six of them."
                    .into(),
                answer: "6".into(),
            },
            seed_record,
        })
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn pool(&self) -> &[Question] {
        &self.pool
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.pool.iter().find(|q| q.id() == id)
    }

    /// Value copies of every pool question carrying `tag`.
    #[must_use]
    pub fn questions_with_tag(&self, tag: &TopicTag) -> Vec<Question> {
        self.pool.iter().filter(|q| q.has_tag(tag)).cloned().collect()
    }

    #[must_use]
    pub fn weekly_exams(&self) -> &[WeeklyExam] {
        &self.weekly_exams
    }

    #[must_use]
    pub fn weekly_exam(&self, id: &ExamId) -> Option<&WeeklyExam> {
        self.weekly_exams.iter().find(|e| e.id() == id)
    }

    #[must_use]
    pub fn daily_challenge(&self) -> &DailyQuestion {
        &self.daily_challenge
    }

    /// The single record returned when the history blob is missing or
    /// corrupt ("first run" ledger content).
    #[must_use]
    pub fn seed_record(&self) -> &ExamRecord {
        &self.seed_record
    }
}

fn built_in_chapters() -> Vec<Chapter> {
    fn leaf(id: &str, title: &str, video_id: &str) -> Chapter {
        Chapter {
            id: id.into(),
            title: title.into(),
            video_id: Some(video_id.into()),
            sub_chapters: Vec::new(),
        }
    }

    vec![
        Chapter {
            id: "1".into(),
            title: "Chapter 1: Numbers and Expressions".into(),
            video_id: None,
            sub_chapters: vec![
                leaf("1-1", "1-1 Real Numbers", "video-1-1"),
                leaf("1-2", "1-2 Polynomial Operations", "video-1-2"),
                leaf("1-3", "1-3 Exponents and Logarithms", "video-1-3"),
            ],
        },
        Chapter {
            id: "2".into(),
            title: "Chapter 2: Lines and Circles".into(),
            video_id: None,
            sub_chapters: vec![
                leaf("2-1", "2-1 Equations of Lines", "video-2-1"),
                leaf("2-2", "2-2 Equations of Circles", "video-2-2"),
            ],
        },
    ]
}

#[allow(clippy::too_many_lines)]
fn built_in_pool() -> Result<Vec<Question>, CatalogError> {
    let tag = |code: &str| TopicTag::new(code);
    let qid = |id: &str| QuestionId::new(id);

    Ok(vec![
        Question::single_choice(
            qid("q1")?,
            "If $x$ is real and $|x-2| \\le 3$, what is the range of $x$?",
            vec![
                "$-1 \\le x \\le 5$".into(),
                "$-5 \\le x \\le 1$".into(),
                "$1 \\le x \\le 5$".into(),
                "$x \\ge 5$ or $x \\le -1$".into(),
            ],
            0,
            "$|x-2| \\le 3$ gives $-3 \\le x-2 \\le 3$; adding 2 throughout, $-1 \\le x \\le 5$.",
            vec![tag("1-1")?],
            2,
        )?,
        Question::fill_in_blank(
            qid("q2")?,
            "Let $a = \\sqrt{7+\\sqrt{48}}$. The integer part of $a$ is ____.",
            "3",
            "$a = \\sqrt{7+2\\sqrt{12}} = \\sqrt{4} + \\sqrt{3} = 2 + 1.732\\ldots = 3.732\\ldots$, \
             so the integer part is 3.",
            vec![tag("1-1")?],
            3,
        )?,
        Question::single_choice(
            qid("q3")?,
            "Given that $1+\\sqrt{2}i$ is a root of a real-coefficient polynomial $f(x)=0$, \
             which factor must $f(x)$ contain?",
            vec![
                "$x^2+2x+3$".into(),
                "$x^2-2x+3$".into(),
                "$x^2-2x-3$".into(),
                "$x^2+2x-3$".into(),
            ],
            1,
            "Complex roots come in conjugate pairs, so $1-\\sqrt{2}i$ is also a root. \
             $(x-(1+\\sqrt{2}i))(x-(1-\\sqrt{2}i)) = (x-1)^2 + 2 = x^2-2x+3$.",
            vec![tag("1-2")?],
            4,
        )?,
        Question::fill_in_blank(
            qid("q4")?,
            "Evaluate: $\\log_2 8 + \\log_3 9 = $ ____.",
            "5",
            "$\\log_2 2^3 + \\log_3 3^2 = 3 + 2 = 5$.",
            vec![tag("1-3")?],
            1,
        )?,
        Question::single_choice(
            qid("q5")?,
            "If $2^x = 32$, then $x = $?",
            vec!["4".into(), "5".into(), "6".into(), "7".into()],
            1,
            "$2^5 = 32$, so $x = 5$.",
            vec![tag("1-3")?],
            1,
        )?,
        Question::fill_in_blank(
            qid("q6")?,
            "Simplify: $\\sqrt{8} + \\sqrt{18} = $ ____.",
            "5\\sqrt{2}",
            "$2\\sqrt{2} + 3\\sqrt{2} = 5\\sqrt{2}$.",
            vec![tag("1-1")?],
            2,
        )?,
        Question::single_choice(
            qid("q7")?,
            "What is the slope of the line $L: 2x - y + 3 = 0$?",
            vec!["2".into(), "-2".into(), "1/2".into(), "-1/2".into()],
            0,
            "Rewriting, $y = 2x + 3$, so the slope is 2.",
            vec![tag("2-1")?],
            1,
        )?,
        Question::fill_in_blank(
            qid("q8")?,
            "The radius of the circle $C: x^2 + y^2 = 25$ is ____.",
            "5",
            "$r^2 = 25 \\implies r = 5$.",
            vec![tag("2-2")?],
            1,
        )?,
        Question::single_choice(
            qid("q9")?,
            "If $(x-1)(x-2) < 0$, what is the range of $x$?",
            vec![
                "$x < 1$".into(),
                "$x > 2$".into(),
                "$1 < x < 2$".into(),
                "$x < 1$ or $x > 2$".into(),
            ],
            2,
            "An upward parabola is negative strictly between its roots.",
            vec![tag("1-2")?],
            2,
        )?,
        Question::fill_in_blank(
            qid("q10")?,
            "Expand: $(a+b)^2 = a^2 + $ ____ $ + b^2$.",
            "2ab",
            "Standard product formula.",
            vec![tag("1-2")?],
            1,
        )?,
    ])
}

/// 2023-10-15T10:20:00Z, the timestamp on the seeded first-run record.
const SEED_RECORD_TIMESTAMP: i64 = 1_697_365_200;

fn built_in_seed_record(pool: &[Question]) -> Result<ExamRecord, CatalogError> {
    let q1 = pool[0].clone();
    let q2 = pool[1].clone();

    let mut answers = AnswerSheet::new();
    answers.set(q1.id().clone(), "0");
    answers.set(q2.id().clone(), "4");

    let recorded_at = chrono::DateTime::from_timestamp(SEED_RECORD_TIMESTAMP, 0)
        .ok_or(CatalogError::InvalidSeedTimestamp)?;

    // One of two answers correct: 50 points.
    Ok(ExamRecord::practice(
        RecordId::new("rec_init_001")?,
        recorded_at,
        "1-1 Real Numbers basics practice",
        50,
        answers,
        vec![q1, q2],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading;
    use crate::model::QuestionKind;

    #[test]
    fn built_in_catalog_is_valid() {
        let catalog = Catalog::built_in().unwrap();
        assert_eq!(catalog.pool().len(), 10);
        assert_eq!(catalog.weekly_exams().len(), 2);
        assert_eq!(catalog.chapters().len(), 2);
    }

    #[test]
    fn invariants_hold_for_every_pool_question() {
        let catalog = Catalog::built_in().unwrap();
        for q in catalog.pool() {
            match q.kind() {
                QuestionKind::SingleChoice => {
                    assert!(!q.options().is_empty());
                    let index: usize = q.correct_answer().parse().unwrap();
                    assert!(index < q.options().len());
                }
                QuestionKind::FillInBlank => assert!(q.options().is_empty()),
            }
            assert!(!q.tags().is_empty());
            assert!((1..=5).contains(&q.difficulty()));
        }
    }

    #[test]
    fn tag_filter_returns_copies() {
        let catalog = Catalog::built_in().unwrap();
        let tag = TopicTag::new("1-1").unwrap();
        let matching = catalog.questions_with_tag(&tag);
        assert_eq!(matching.len(), 3);
        assert!(matching.iter().all(|q| q.has_tag(&tag)));
    }

    #[test]
    fn seed_record_score_matches_its_own_answers() {
        let catalog = Catalog::built_in().unwrap();
        let seed = catalog.seed_record();
        let correct = grading::correct_count(seed.questions(), seed.answers());
        assert_eq!(
            grading::score_percent(correct, seed.questions().len()),
            seed.score()
        );
    }

    #[test]
    fn daily_challenge_grades_by_trimmed_equality() {
        let catalog = Catalog::built_in().unwrap();
        assert!(catalog.daily_challenge().is_correct(" 6 "));
        assert!(!catalog.daily_challenge().is_correct("six"));
    }

    #[test]
    fn weekly_exam_lookup_by_id() {
        let catalog = Catalog::built_in().unwrap();
        let id = ExamId::new("exam_w2").unwrap();
        assert!(catalog.weekly_exam(&id).is_some());
        assert!(catalog.weekly_exam(&ExamId::new("exam_w9").unwrap()).is_none());
    }
}
