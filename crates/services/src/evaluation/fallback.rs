use std::sync::Arc;

use async_trait::async_trait;

use civics_core::model::Evaluation;

use super::{EvaluationRequest, Evaluator};
use crate::error::EvaluationError;

/// Uses `secondary` whenever `primary` cannot produce a verdict.
#[derive(Clone)]
pub struct FallbackEvaluator {
    primary: Arc<dyn Evaluator>,
    secondary: Arc<dyn Evaluator>,
}

impl FallbackEvaluator {
    #[must_use]
    pub fn new(primary: Arc<dyn Evaluator>, secondary: Arc<dyn Evaluator>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl Evaluator for FallbackEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        match self.primary.evaluate(request).await {
            Ok(evaluation) => Ok(evaluation),
            Err(err) => {
                tracing::warn!(error = %err, "primary evaluator failed, using fallback");
                self.secondary.evaluate(request).await
            }
        }
    }
}
