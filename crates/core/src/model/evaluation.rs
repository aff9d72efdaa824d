use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Verdict for one submitted free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub is_correct: bool,
    pub feedback: String,
}

impl Evaluation {
    #[must_use]
    pub fn correct(feedback: impl Into<String>) -> Self {
        Self {
            is_correct: true,
            feedback: feedback.into(),
        }
    }

    #[must_use]
    pub fn incorrect(feedback: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            feedback: feedback.into(),
        }
    }
}

/// One answered question inside a quiz session.
///
/// Created once per answered question and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAnswerRecord {
    pub question: Question,
    pub user_answer: String,
    pub is_correct: bool,
    pub feedback: String,
}

impl UserAnswerRecord {
    #[must_use]
    pub fn new(question: Question, user_answer: impl Into<String>, evaluation: Evaluation) -> Self {
        Self {
            question,
            user_answer: user_answer.into(),
            is_correct: evaluation.is_correct,
            feedback: evaluation.feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_uses_camel_case_keys() {
        let parsed: Evaluation =
            serde_json::from_str(r#"{"isCorrect":true,"feedback":"Correct!"}"#).unwrap();
        assert_eq!(parsed, Evaluation::correct("Correct!"));

        let json = serde_json::to_string(&Evaluation::incorrect("No")).unwrap();
        assert_eq!(json, r#"{"isCorrect":false,"feedback":"No"}"#);
    }
}
