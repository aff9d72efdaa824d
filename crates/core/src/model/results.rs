use chrono::{DateTime, Utc};

use crate::model::UserAnswerRecord;

//
// ─── PERCENTAGE ────────────────────────────────────────────────────────────────
//

/// `correct / total * 100` rounded half-up, or `0` when `total` is zero.
#[must_use]
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (correct.saturating_mul(200) + total) / total.saturating_mul(2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

//
// ─── CATEGORY BREAKDOWN ────────────────────────────────────────────────────────
//

/// Score for one category within a finished quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: String,
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Group answers by question category.
///
/// Categories appear in the order they were first answered.
#[must_use]
pub fn category_breakdown(answers: &[UserAnswerRecord]) -> Vec<CategoryScore> {
    let mut scores: Vec<CategoryScore> = Vec::new();
    for answer in answers {
        let category = &answer.question.category;
        let index = match scores.iter().position(|s| &s.category == category) {
            Some(index) => index,
            None => {
                scores.push(CategoryScore {
                    category: category.clone(),
                    correct: 0,
                    total: 0,
                    percentage: 0,
                });
                scores.len() - 1
            }
        };
        let entry = &mut scores[index];
        entry.total += 1;
        if answer.is_correct {
            entry.correct += 1;
        }
    }
    for entry in &mut scores {
        entry.percentage = percentage(entry.correct, entry.total);
    }
    scores
}

//
// ─── QUIZ RESULTS ──────────────────────────────────────────────────────────────
//

/// Final score of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub categories: Vec<CategoryScore>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResults {
    /// Aggregate the answers of a quiz that asked `total` questions.
    #[must_use]
    pub fn from_answers(
        answers: &[UserAnswerRecord],
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count();
        Self {
            score,
            total,
            percentage: percentage(score, total),
            categories: category_breakdown(answers),
            started_at,
            completed_at,
        }
    }

    /// Score for a single category, if any of its questions were answered.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == name)
    }
}

//
// ─── FLASHCARD RESULTS ─────────────────────────────────────────────────────────
//

/// Final tally of a flashcard study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashcardResults {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    pub accuracy: u32,
}

impl FlashcardResults {
    #[must_use]
    pub fn new(correct: usize, incorrect: usize) -> Self {
        let total = correct + incorrect;
        Self {
            correct,
            incorrect,
            total,
            accuracy: percentage(correct, total),
        }
    }
}
