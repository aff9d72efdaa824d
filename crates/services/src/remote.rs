use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use civics_core::model::Question;
use storage::repository::{QuestionRepository, StorageError};

/// HTTP access to a quiz server.
#[derive(Clone, Debug)]
pub struct RemoteServer {
    client: Client,
    base_url: String,
}

impl RemoteServer {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for a server path such as `api/evaluate`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Question set served by the quiz server (`/questions.json`, `/api/categories`).
#[derive(Clone, Debug)]
pub struct HttpQuestionRepository {
    server: RemoteServer,
}

impl HttpQuestionRepository {
    #[must_use]
    pub fn new(server: RemoteServer) -> Self {
        Self { server }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StorageError> {
        let url = self.server.endpoint(path);
        let response = self
            .server
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Connection(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

#[async_trait]
impl QuestionRepository for HttpQuestionRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.get_json("questions.json").await
    }

    async fn load_categories(&self) -> Result<Vec<String>, StorageError> {
        self.get_json("api/categories").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let server = RemoteServer::new("http://localhost:8008/");
        assert_eq!(
            server.endpoint("/api/evaluate"),
            "http://localhost:8008/api/evaluate"
        );
        let server = RemoteServer::new("http://localhost:8008/quiz");
        assert_eq!(
            server.endpoint("questions.json"),
            "http://localhost:8008/quiz/questions.json"
        );
    }
}
