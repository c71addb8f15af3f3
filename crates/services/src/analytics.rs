//! History-derived analytics for the dashboard: per-topic mastery and the
//! exam score trend. Pure functions over the record sequence.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use portal_core::grading;
use portal_core::model::{ExamRecord, RecordKind, TopicTag};

/// How many sittings the dashboard trend shows.
pub const TREND_LIMIT: usize = 8;

/// Accuracy over every answered occurrence of one topic tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMastery {
    pub tag: TopicTag,
    pub correct: u32,
    pub total: u32,
    pub percent: u8,
}

/// One point on the exam score trend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub title: String,
    pub recorded_at: DateTime<Utc>,
    pub score: u8,
}

/// Aggregates per-topic accuracy across all records, keyed by each
/// question's primary tag. Unanswered questions count against the topic.
#[must_use]
pub fn topic_mastery(records: &[ExamRecord]) -> Vec<TopicMastery> {
    let mut buckets: BTreeMap<TopicTag, (u32, u32)> = BTreeMap::new();

    for record in records {
        for question in record.questions() {
            let graded = record
                .answers()
                .get(question.id())
                .is_some_and(|a| grading::grade(question, a));
            let (correct, total) = buckets.entry(question.primary_tag().clone()).or_default();
            *total += 1;
            if graded {
                *correct += 1;
            }
        }
    }

    buckets
        .into_iter()
        .map(|(tag, (correct, total))| TopicMastery {
            tag,
            correct,
            total,
            percent: grading::score_percent(correct as usize, total as usize),
        })
        .collect()
}

/// The most recent exam scores, oldest first, capped at `limit` points.
/// Practice records never appear on the trend.
#[must_use]
pub fn exam_score_trend(records: &[ExamRecord], limit: usize) -> Vec<TrendPoint> {
    // The ledger is most-recent-first; take the newest `limit` then flip.
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter(|r| r.kind() == RecordKind::Exam)
        .take(limit)
        .map(|r| TrendPoint {
            title: r.title().to_string(),
            recorded_at: r.recorded_at(),
            score: r.score(),
        })
        .collect();
    points.reverse();
    points
}
