#![forbid(unsafe_code)]

pub mod app_services;
pub mod app_settings_service;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod flashcards;
pub mod question_bank;
pub mod remote;
pub mod selection;
pub mod sessions;

pub use civics_core::Clock;

pub use app_services::AppServices;
pub use app_settings_service::AppSettingsService;
pub use config::AppConfig;
pub use error::{
    AppServicesError, AppSettingsServiceError, ConfigError, EvaluationError, ProviderError,
    QuestionBankError, SessionError,
};
pub use evaluation::{
    AiEvaluator, AiEvaluatorConfig, EvaluationRequest, Evaluator, FallbackEvaluator,
    HttpEvaluator, MatchingEvaluator,
};
pub use flashcards::{BankFlashcardProvider, FlashcardProvider, FlashcardRequest, HttpFlashcardProvider};
pub use question_bank::{Catalog, QuestionBank};
pub use remote::{HttpQuestionRepository, RemoteServer};
pub use sessions::{
    CardView, FlashcardController, FlashcardStep, FlashcardTally, QuestionView, QuizController,
    QuizStep, SessionPhase, SessionProgress, SubmitOutcome,
};
