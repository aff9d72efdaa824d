use std::sync::Arc;

use civics_core::model::Question;
use storage::json::JsonQuestionRepository;
use storage::repository::{QuestionRepository, Storage};

use crate::Clock;
use crate::app_settings_service::AppSettingsService;
use crate::config::AppConfig;
use crate::error::{AppServicesError, QuestionBankError};
use crate::evaluation::{AiEvaluator, Evaluator, FallbackEvaluator, HttpEvaluator, MatchingEvaluator};
use crate::flashcards::{BankFlashcardProvider, FlashcardProvider, HttpFlashcardProvider};
use crate::question_bank::QuestionBank;
use crate::remote::{HttpQuestionRepository, RemoteServer};
use crate::sessions::{FlashcardController, QuizController};

/// Assembles the question bank, grading, flashcard source and preferences.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    bank: Arc<QuestionBank>,
    evaluator: Arc<dyn Evaluator>,
    flashcards: Arc<dyn FlashcardProvider>,
    app_settings: Arc<AppSettingsService>,
}

impl AppServices {
    /// Build services from configuration, with the preference stored in `SQLite`.
    ///
    /// Questions are not loaded yet; call [`AppServices::load_questions`].
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(config: &AppConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let server = config.server_url.as_deref().map(RemoteServer::new);

        let questions: Arc<dyn QuestionRepository> = match &server {
            Some(server) => Arc::new(HttpQuestionRepository::new(server.clone())),
            None => Arc::new(JsonQuestionRepository::new(config.questions_path.clone())),
        };
        let storage = Storage::sqlite(&config.db_url, questions).await?;
        let bank = Arc::new(QuestionBank::new());

        let evaluator = build_evaluator(config, server.as_ref());
        let flashcards: Arc<dyn FlashcardProvider> = match &server {
            Some(server) => Arc::new(HttpFlashcardProvider::new(server.clone())),
            None => Arc::new(BankFlashcardProvider::new(Arc::clone(&bank))),
        };
        tracing::info!(
            server = config.server_url.as_deref().unwrap_or("none"),
            questions_path = %config.questions_path.display(),
            ai = config.ai.is_some(),
            fallback = config.evaluation_fallback,
            "services configured"
        );

        Ok(Self::assemble(clock, storage, bank, evaluator, flashcards))
    }

    /// Build services over in-memory storage with local grading and flashcards.
    #[must_use]
    pub fn in_memory(questions: Vec<Question>, clock: Clock) -> Self {
        let storage = Storage::in_memory(questions);
        let bank = Arc::new(QuestionBank::new());
        let flashcards = Arc::new(BankFlashcardProvider::new(Arc::clone(&bank)));
        Self::assemble(clock, storage, bank, Arc::new(MatchingEvaluator::new()), flashcards)
    }

    fn assemble(
        clock: Clock,
        storage: Storage,
        bank: Arc<QuestionBank>,
        evaluator: Arc<dyn Evaluator>,
        flashcards: Arc<dyn FlashcardProvider>,
    ) -> Self {
        Self {
            clock,
            questions: storage.questions,
            bank,
            evaluator,
            flashcards,
            app_settings: Arc::new(AppSettingsService::new(storage.app_settings)),
        }
    }

    /// Load questions and categories into the shared bank.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if either source fails; retrying is safe.
    pub async fn load_questions(&self) -> Result<(), QuestionBankError> {
        self.bank.load(self.questions.as_ref()).await
    }

    /// A fresh quiz controller sharing the bank and grader.
    #[must_use]
    pub fn quiz(&self) -> QuizController {
        QuizController::new(Arc::clone(&self.bank), Arc::clone(&self.evaluator))
            .with_clock(self.clock)
    }

    /// A fresh flashcard controller sharing the configured provider.
    #[must_use]
    pub fn flashcards(&self) -> FlashcardController {
        FlashcardController::new(Arc::clone(&self.bank), Arc::clone(&self.flashcards))
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn app_settings(&self) -> Arc<AppSettingsService> {
        Arc::clone(&self.app_settings)
    }
}

/// Server grading first, then direct AI grading, then local matching.
///
/// Direct AI grading always falls back to local matching when the model call
/// fails. Server grading only does so when `evaluation_fallback` is set, since
/// the server runs its own fallback.
fn build_evaluator(config: &AppConfig, server: Option<&RemoteServer>) -> Arc<dyn Evaluator> {
    let matching: Arc<dyn Evaluator> = Arc::new(MatchingEvaluator::new());
    match (server, &config.ai) {
        (Some(server), _) => {
            let http: Arc<dyn Evaluator> = Arc::new(HttpEvaluator::new(server.clone()));
            if config.evaluation_fallback {
                Arc::new(FallbackEvaluator::new(http, matching))
            } else {
                http
            }
        }
        (None, Some(ai)) => {
            let ai: Arc<dyn Evaluator> = Arc::new(AiEvaluator::new(Some(ai.clone())));
            Arc::new(FallbackEvaluator::new(ai, matching))
        }
        (None, None) => matching,
    }
}
