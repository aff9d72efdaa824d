use async_trait::async_trait;

use civics_core::model::Evaluation;

use super::{EvaluationRequest, Evaluator};
use crate::error::EvaluationError;

const CORRECT_FEEDBACK: &str = "Correct! Your answer matches one of the acceptable responses.";
const INCORRECT_FEEDBACK: &str = "Incorrect. Please review the acceptable answers.";

/// Offline grading by case-insensitive equality or containment.
///
/// An answer is correct when it equals an acceptable answer, contains one, or
/// is contained in one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingEvaluator;

impl MatchingEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn grade(user_answer: &str, acceptable_answers: &[String]) -> Evaluation {
        let typed = user_answer.trim().to_lowercase();
        if typed.is_empty() {
            return Evaluation::incorrect(INCORRECT_FEEDBACK);
        }

        let matched = acceptable_answers.iter().any(|acceptable| {
            let acceptable = acceptable.trim().to_lowercase();
            !acceptable.is_empty()
                && (typed == acceptable || acceptable.contains(&typed) || typed.contains(&acceptable))
        });

        if matched {
            Evaluation::correct(CORRECT_FEEDBACK)
        } else {
            Evaluation::incorrect(INCORRECT_FEEDBACK)
        }
    }
}

#[async_trait]
impl Evaluator for MatchingEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        Ok(Self::grade(&request.user_answer, &request.acceptable_answers))
    }
}
