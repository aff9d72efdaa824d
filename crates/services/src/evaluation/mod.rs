//! Answer evaluators: remote grading service, direct AI grading, and local
//! string matching.

mod ai;
mod fallback;
mod http;
mod matching;

use async_trait::async_trait;
use serde::Serialize;

use civics_core::model::{Evaluation, Question};

use crate::error::EvaluationError;

pub use ai::{AiEvaluator, AiEvaluatorConfig};
pub use fallback::FallbackEvaluator;
pub use http::HttpEvaluator;
pub use matching::MatchingEvaluator;

/// One answer to grade. Serializes to the grading service's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub question: String,
    pub user_answer: String,
    pub acceptable_answers: Vec<String>,
}

impl EvaluationRequest {
    #[must_use]
    pub fn new(question: &Question, user_answer: impl Into<String>) -> Self {
        Self {
            question: question.question.clone(),
            user_answer: user_answer.into(),
            acceptable_answers: question.answer.clone(),
        }
    }
}

/// Produces a verdict for a free-text answer.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Grade one answer.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError` when no verdict could be obtained.
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError>;
}
