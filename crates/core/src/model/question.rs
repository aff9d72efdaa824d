use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question has no acceptable answers: {question}")]
    NoAnswers { question: String },

    #[error("question category cannot be empty: {question}")]
    EmptyCategory { question: String },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A short-answer civics question with every answer that should be accepted.
///
/// Field names match the JSON shape of the question file and the quiz server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: Vec<String>,
    pub category: String,
}

impl Question {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        answer: impl IntoIterator<Item = impl Into<String>>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into_iter().map(Into::into).collect(),
            category: category.into(),
        }
    }

    /// Acceptable answers in their original order.
    #[must_use]
    pub fn acceptable_answers(&self) -> &[String] {
        &self.answer
    }

    /// Check that a loaded question can be asked and graded.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text or category is blank or no answer is listed.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.answer.iter().all(|answer| answer.trim().is_empty()) {
            return Err(QuestionError::NoAnswers {
                question: self.question.clone(),
            });
        }
        if self.category.trim().is_empty() {
            return Err(QuestionError::EmptyCategory {
                question: self.question.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_question_file_shape() {
        let raw = r#"{
            "question": "What is the supreme law of the land?",
            "answer": ["the Constitution"],
            "category": "Principles of American Democracy"
        }"#;
        let question: Question = serde_json::from_str(raw).unwrap();
        assert_eq!(question.acceptable_answers(), ["the Constitution"]);
        assert_eq!(question.category, "Principles of American Democracy");
        assert!(question.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let blank = Question::new("  ", ["x"], "History");
        assert_eq!(blank.validate(), Err(QuestionError::EmptyText));

        let no_answers = Question::new("Q?", [" "], "History");
        assert!(matches!(
            no_answers.validate(),
            Err(QuestionError::NoAnswers { .. })
        ));

        let no_category = Question::new("Q?", ["A"], "");
        assert!(matches!(
            no_category.validate(),
            Err(QuestionError::EmptyCategory { .. })
        ));
    }
}
