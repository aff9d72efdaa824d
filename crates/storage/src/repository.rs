use async_trait::async_trait;
use civics_core::model::{AppSettings, Question};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-only source of the question set and its category list.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load the full question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be read or decoded.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Load the category list. Order defines presentation order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the categories cannot be read or decoded.
    async fn load_categories(&self) -> Result<Vec<String>, StorageError>;
}

/// Persistence for the display preference.
#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    /// Fetch persisted settings, `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Distinct categories of a question set, sorted alphabetically.
#[must_use]
pub fn categories_of(questions: &[Question]) -> Vec<String> {
    questions
        .iter()
        .map(|q| q.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    categories: Arc<Mutex<Option<Vec<String>>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository preloaded with questions; categories are derived from them.
    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.questions.lock() {
            *guard = questions;
        }
        repo
    }

    /// Override the derived category list with an explicit ordering.
    #[must_use]
    pub fn with_categories(self, categories: Vec<String>) -> Self {
        if let Ok(mut guard) = self.categories.lock() {
            *guard = Some(categories);
        }
        self
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn load_categories(&self) -> Result<Vec<String>, StorageError> {
        let explicit = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .clone();
        if let Some(categories) = explicit {
            return Ok(categories);
        }
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(categories_of(&guard))
    }
}

#[async_trait]
impl AppSettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub app_settings: Arc<dyn AppSettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        let repo = InMemoryRepository::with_questions(questions);
        let question_repo: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let settings_repo: Arc<dyn AppSettingsRepository> = Arc::new(repo);
        Self {
            questions: question_repo,
            app_settings: settings_repo,
        }
    }
}
