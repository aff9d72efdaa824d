//! Random question and card selection.
//!
//! Every function works on an owned copy; the caller's slice is never reordered.

use rand::Rng;
use rand::seq::SliceRandom;

use civics_core::model::{QUIZ_LENGTH, Question, QuizMode};

/// Uniformly shuffled copy of `items` (Fisher–Yates).
#[must_use]
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

/// Up to `count` distinct elements of `items` in random order.
#[must_use]
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let mut picked = shuffled(items, rng);
    picked.truncate(count);
    picked
}

/// Questions eligible for a quiz in the given mode.
///
/// Category mode without a category yields an empty pool.
#[must_use]
pub fn quiz_pool<'a>(
    questions: &'a [Question],
    mode: QuizMode,
    category: Option<&str>,
) -> Vec<&'a Question> {
    match (mode, category) {
        (QuizMode::Mock, _) => questions.iter().collect(),
        (QuizMode::Category, Some(category)) => questions
            .iter()
            .filter(|q| q.category == category)
            .collect(),
        (QuizMode::Category, None) => Vec::new(),
    }
}

/// Pick at most [`QUIZ_LENGTH`] random questions for a new quiz.
#[must_use]
pub fn select_quiz_questions<R: Rng + ?Sized>(
    questions: &[Question],
    mode: QuizMode,
    category: Option<&str>,
    rng: &mut R,
) -> Vec<Question> {
    let pool = quiz_pool(questions, mode, category);
    sample(&pool, QUIZ_LENGTH, rng)
        .into_iter()
        .cloned()
        .collect()
}
