use std::sync::OnceLock;

use civics_core::model::Question;
use storage::repository::QuestionRepository;

use crate::error::QuestionBankError;

/// The loaded question set and its category list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
    categories: Vec<String>,
}

impl Catalog {
    #[must_use]
    pub fn new(questions: Vec<Question>, categories: Vec<String>) -> Self {
        Self {
            questions,
            categories,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Categories in presentation order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

/// Load-once, read-only access to the question set.
///
/// Until [`QuestionBank::load`] succeeds every accessor returns `None`, which the
/// session controllers report as `SessionError::NotReady`.
#[derive(Debug, Default)]
pub struct QuestionBank {
    catalog: OnceLock<Catalog>,
}

impl QuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A bank that is ready immediately.
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        let bank = Self::new();
        let _ = bank.catalog.set(catalog);
        bank
    }

    /// Fetch questions and categories together. A bank that is already loaded
    /// keeps its catalog.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` if either request fails; the bank
    /// stays unloaded so the load can be retried.
    pub async fn load(&self, repo: &dyn QuestionRepository) -> Result<(), QuestionBankError> {
        if self.is_ready() {
            return Ok(());
        }

        let (questions, categories) =
            tokio::try_join!(repo.load_questions(), repo.load_categories())?;
        tracing::info!(
            questions = questions.len(),
            categories = categories.len(),
            "question bank loaded"
        );

        let _ = self.catalog.set(Catalog::new(questions, categories));
        Ok(())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.catalog.get().is_some()
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.get()
    }

    #[must_use]
    pub fn questions(&self) -> Option<&[Question]> {
        self.catalog().map(Catalog::questions)
    }

    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.catalog().map(Catalog::categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};

    struct FailingRepository;

    #[async_trait]
    impl QuestionRepository for FailingRepository {
        async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn load_categories(&self) -> Result<Vec<String>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn not_ready_until_loaded() {
        let bank = QuestionBank::new();
        assert!(!bank.is_ready());
        assert!(bank.questions().is_none());

        let repo = InMemoryRepository::with_questions(vec![
            Question::new("Q1", ["A"], "History"),
            Question::new("Q2", ["B"], "Civics"),
        ]);
        bank.load(&repo).await.unwrap();

        assert!(bank.is_ready());
        assert_eq!(bank.questions().unwrap().len(), 2);
        assert_eq!(bank.categories().unwrap(), ["Civics", "History"]);
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let bank = QuestionBank::new();
        let err = bank.load(&FailingRepository).await.unwrap_err();
        assert!(matches!(err, QuestionBankError::Storage(_)));
        assert!(!bank.is_ready());

        let repo = InMemoryRepository::with_questions(vec![Question::new("Q", ["A"], "X")]);
        bank.load(&repo).await.unwrap();
        assert!(bank.is_ready());
    }

    #[tokio::test]
    async fn second_load_keeps_first_catalog() {
        let bank = QuestionBank::from_catalog(Catalog::new(
            vec![Question::new("Q", ["A"], "X")],
            vec!["X".into()],
        ));
        let other = InMemoryRepository::with_questions(Vec::new());
        bank.load(&other).await.unwrap();
        assert_eq!(bank.questions().unwrap().len(), 1);
    }
}
