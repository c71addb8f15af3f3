//! Shared grading primitive used by the practice, exam, remediation, and
//! daily-challenge flows.
//!
//! Grading is exact trimmed-string equality. Mathematically equivalent forms
//! written differently (`5\sqrt{2}` vs `\sqrt{2}\cdot 5`, `01` vs `1`) are
//! NOT considered equal. This is a deliberate simplicity choice and a known
//! limitation; do not normalize here without a product decision.

use crate::model::{AnswerSheet, Question};

/// Compares a submitted answer against an expected one.
#[must_use]
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim() == expected.trim()
}

/// Grades one question. The submitted value is an option index for single
/// choice and free text for fill-in-blank; both go through the same rule.
#[must_use]
pub fn grade(question: &Question, submitted: &str) -> bool {
    answers_match(submitted, question.correct_answer())
}

/// Counts correct answers over a question snapshot. Unanswered questions
/// grade as incorrect.
#[must_use]
pub fn correct_count(questions: &[Question], answers: &AnswerSheet) -> usize {
    questions
        .iter()
        .filter(|q| answers.get(q.id()).is_some_and(|a| grade(q, a)))
        .count()
}

/// Rounded percentage score: `round(100 * correct / total)`.
///
/// Returns 0 for an empty snapshot rather than dividing by zero; session
/// construction refuses empty snapshots so this is a belt guard only.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, TopicTag};

    fn tag() -> TopicTag {
        TopicTag::new("1-1").unwrap()
    }

    fn single_choice(id: &str, correct_index: usize) -> Question {
        Question::single_choice(
            QuestionId::new(id).unwrap(),
            "pick one",
            vec!["a".into(), "b".into(), "c".into()],
            correct_index,
            "",
            vec![tag()],
            1,
        )
        .unwrap()
    }

    fn fill_in(id: &str, answer: &str) -> Question {
        Question::fill_in_blank(QuestionId::new(id).unwrap(), "fill", answer, "", vec![tag()], 1)
            .unwrap()
    }

    #[test]
    fn trimmed_equality_matches() {
        let q = fill_in("q2", "3");
        assert!(grade(&q, " 3 "));
        assert!(!grade(&q, "4"));
    }

    #[test]
    fn no_numeric_coercion() {
        let q = single_choice("q1", 1);
        assert!(grade(&q, "1"));
        assert!(!grade(&q, "01"));
    }

    #[test]
    fn no_normalization_of_equivalent_forms() {
        let q = fill_in("q6", "5\\sqrt{2}");
        assert!(grade(&q, "5\\sqrt{2}"));
        assert!(!grade(&q, "\\sqrt{2}\\cdot 5"));
    }

    #[test]
    fn unanswered_counts_as_incorrect() {
        let questions = vec![single_choice("q1", 0), fill_in("q2", "3")];
        let mut answers = AnswerSheet::new();
        answers.set(QuestionId::new("q1").unwrap(), "0");

        assert_eq!(correct_count(&questions, &answers), 1);
    }

    #[test]
    fn score_rounds_to_nearest_percent() {
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(5, 5), 100);
        assert_eq!(score_percent(0, 7), 0);
    }

    #[test]
    fn empty_snapshot_scores_zero() {
        assert_eq!(score_percent(0, 0), 0);
    }
}
