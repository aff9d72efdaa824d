//! Shared error types for the services crate.

use thiserror::Error;

use civics_core::model::AppSettingsError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by answer evaluators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvaluationError {
    #[error("answer grading is not configured")]
    Disabled,
    #[error("grading service returned an empty response")]
    EmptyResponse,
    #[error("grading service returned an unreadable verdict: {0}")]
    Decode(String),
    #[error("grading request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by flashcard providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("questions have not been loaded")]
    NotReady,
    #[error("flashcard request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while loading the question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz and flashcard session controllers.
///
/// A failed operation never leaves a session half-updated.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("questions are still loading")]
    NotReady,
    #[error("answer cannot be empty")]
    EmptyInput,
    #[error("no questions available for this selection")]
    EmptySelection,
    #[error("could not evaluate the answer: {0}")]
    EvaluationUnavailable(#[source] EvaluationError),
    #[error("could not load flashcards: {0}")]
    FlashcardsUnavailable(#[source] ProviderError),
    #[error("card must be flipped before it is marked")]
    NotFlipped,
    #[error("flashcard count must be greater than zero")]
    InvalidCount,
    #[error("no session in progress")]
    NoActiveSession,
    #[error("current question was already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("results are only available once the session is finished")]
    ResultsUnavailable,
}

impl SessionError {
    /// Whether repeating the same call later can succeed without user changes.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::NotReady
                | SessionError::EvaluationUnavailable(_)
                | SessionError::FlashcardsUnavailable(_)
        )
    }
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {key} value: {raw}")]
    InvalidUrl { key: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
