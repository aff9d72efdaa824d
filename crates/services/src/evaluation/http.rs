use async_trait::async_trait;

use civics_core::model::Evaluation;

use super::{EvaluationRequest, Evaluator};
use crate::error::EvaluationError;
use crate::remote::RemoteServer;

/// Grades answers through the quiz server's `POST /api/evaluate`.
#[derive(Clone, Debug)]
pub struct HttpEvaluator {
    server: RemoteServer,
}

impl HttpEvaluator {
    #[must_use]
    pub fn new(server: RemoteServer) -> Self {
        Self { server }
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        let response = self
            .server
            .client()
            .post(self.server.endpoint("api/evaluate"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EvaluationError::HttpStatus(response.status()));
        }

        let evaluation: Evaluation = response.json().await?;
        Ok(evaluation)
    }
}
