//! Practice question selection: filter, shuffle, clamp.

use portal_core::catalog::Catalog;
use portal_core::model::{Question, TopicTag};
use rand::Rng;
use rand::seq::SliceRandom;

/// What the learner picked on the practice setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeConfig {
    /// Restrict the pool to questions carrying this tag; `None` draws from
    /// the whole pool.
    pub tag: Option<TopicTag>,
    /// Requested number of questions. The sample is clamped to the number of
    /// matching questions, so asking for 5 against a 2-question topic yields
    /// a 2-question session.
    pub count: usize,
}

impl PracticeConfig {
    #[must_use]
    pub fn new(tag: Option<TopicTag>, count: usize) -> Self {
        Self { tag, count }
    }

    /// Session title derived from the selection.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.tag {
            Some(tag) => format!("Topic {tag} practice"),
            None => "Mixed practice".to_string(),
        }
    }
}

/// Draws a uniform random sample without replacement for a practice session.
///
/// The random source is injected so tests can pin the selection order;
/// production callers pass `rand::rng()`.
#[must_use]
pub fn sample_questions<R: Rng + ?Sized>(
    catalog: &Catalog,
    config: &PracticeConfig,
    rng: &mut R,
) -> Vec<Question> {
    let mut matching: Vec<Question> = match &config.tag {
        Some(tag) => catalog.questions_with_tag(tag),
        None => catalog.pool().to_vec(),
    };
    matching.shuffle(rng);
    matching.truncate(config.count.min(matching.len()));
    matching
}
