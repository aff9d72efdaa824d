use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Separator used when several acceptable answers are shown on one card face.
const ANSWER_SEPARATOR: &str = " / ";

/// A two-sided study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub category: String,
}

impl Flashcard {
    #[must_use]
    pub fn new(
        front: impl Into<String>,
        back: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            category: category.into(),
        }
    }

    /// Build a card whose back lists every acceptable answer of the question.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            front: question.question.clone(),
            back: question.answer.join(ANSWER_SEPARATOR),
            category: question.category.clone(),
        }
    }
}

impl From<Question> for Flashcard {
    fn from(question: Question) -> Self {
        Self::from_question(&question)
    }
}
