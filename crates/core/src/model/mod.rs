mod exam;
mod ids;
mod question;
mod record;
mod user_stats;

pub use ids::{ExamId, IdError, QuestionId, RecordId, TopicTag};

pub use exam::{ExamError, ExamStatus, WeeklyExam};
pub use question::{Question, QuestionError, QuestionKind};
pub use record::{AnswerSheet, ExamRecord, ExamStats, RecordError, RecordKind, TOTAL_SCORE};
pub use user_stats::{DAILY_CHALLENGE_POINTS, UserStats};
