use async_trait::async_trait;

use civics_core::model::{Flashcard, Question};

use super::{FlashcardProvider, FlashcardRequest};
use crate::error::ProviderError;
use crate::remote::RemoteServer;

/// Fetches a random question sample from `GET /api/questions` and turns each
/// question into a card.
#[derive(Clone, Debug)]
pub struct HttpFlashcardProvider {
    server: RemoteServer,
}

impl HttpFlashcardProvider {
    #[must_use]
    pub fn new(server: RemoteServer) -> Self {
        Self { server }
    }
}

#[async_trait]
impl FlashcardProvider for HttpFlashcardProvider {
    async fn fetch(&self, request: &FlashcardRequest) -> Result<Vec<Flashcard>, ProviderError> {
        let mut query = vec![("count", request.count.to_string())];
        if let Some(category) = &request.category {
            query.push(("category", category.clone()));
        }

        let response = self
            .server
            .client()
            .get(self.server.endpoint("api/questions"))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        let questions: Vec<Question> = response.json().await?;
        tracing::debug!(
            requested = request.count,
            received = questions.len(),
            "fetched flashcards"
        );
        Ok(questions.iter().map(Flashcard::from_question).collect())
    }
}
