//! Read-only projections handed to the presentation layer.
//!
//! These carry raw values only; formatting is left to the caller.

use civics_core::model::{Evaluation, FlashcardResults, QuizResults};

/// Lifecycle shared by both session controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    InProgress,
    Terminal,
}

/// The question currently being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// Zero-based position in the quiz.
    pub index: usize,
    /// One-based position, as shown to the user.
    pub number: usize,
    pub total: usize,
    pub question: String,
    pub category: String,
    pub progress_percent: u32,
}

/// What follows a `next_question` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStep {
    Question(QuestionView),
    Finished(QuizResults),
}

/// Verdict for a submitted answer plus what the view needs to explain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub evaluation: Evaluation,
    pub acceptable_answers: Vec<String>,
    pub score: usize,
    /// True when this was the last question of the quiz.
    pub is_last: bool,
}

/// The card currently on top of the deck. `back` is only filled once flipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub index: usize,
    pub number: usize,
    pub total: usize,
    pub front: String,
    pub category: String,
    pub back: Option<String>,
}

impl CardView {
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.back.is_some()
    }
}

/// What follows a `mark` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashcardStep {
    Card(CardView),
    Finished(FlashcardResults),
}

/// Running count of judged cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashcardTally {
    pub correct: usize,
    pub incorrect: usize,
}
