use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use civics_core::model::Question;
use tokio::sync::OnceCell;

use crate::repository::{QuestionRepository, StorageError, categories_of};

/// Question set stored as a JSON array on disk.
///
/// A missing file is treated as an empty question set. The file is read once;
/// later calls, including `load_categories`, reuse that read. Failed reads are
/// not cached.
#[derive(Debug, Clone)]
pub struct JsonQuestionRepository {
    path: PathBuf,
    loaded: OnceCell<Vec<Question>>,
}

impl JsonQuestionRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    async fn questions(&self) -> Result<&[Question], StorageError> {
        self.loaded
            .get_or_try_init(|| self.read())
            .await
            .map(Vec::as_slice)
    }

    async fn read(&self) -> Result<Vec<Question>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "question file not found");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StorageError::Connection(err.to_string())),
        };

        let questions: Vec<Question> = serde_json::from_slice(&raw)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let mut valid = Vec::with_capacity(questions.len());
        for question in questions {
            match question.validate() {
                Ok(()) => valid.push(question),
                Err(err) => tracing::warn!(error = %err, "skipping invalid question"),
            }
        }
        Ok(valid)
    }
}

#[async_trait]
impl QuestionRepository for JsonQuestionRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.questions().await.map(<[Question]>::to_vec)
    }

    async fn load_categories(&self) -> Result<Vec<String>, StorageError> {
        Ok(categories_of(self.questions().await?))
    }
}
