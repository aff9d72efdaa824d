use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;

use civics_core::model::{Flashcard, QuizMode};

use super::{FlashcardProvider, FlashcardRequest};
use crate::error::ProviderError;
use crate::question_bank::QuestionBank;
use crate::selection::{quiz_pool, sample};

/// Builds decks from the loaded question bank.
pub struct BankFlashcardProvider {
    bank: Arc<QuestionBank>,
    rng: Mutex<StdRng>,
}

impl BankFlashcardProvider {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic decks for tests.
    #[must_use]
    pub fn with_seed(bank: Arc<QuestionBank>, seed: u64) -> Self {
        Self {
            bank,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl FlashcardProvider for BankFlashcardProvider {
    async fn fetch(&self, request: &FlashcardRequest) -> Result<Vec<Flashcard>, ProviderError> {
        let questions = self.bank.questions().ok_or(ProviderError::NotReady)?;
        let mode = if request.category.is_some() {
            QuizMode::Category
        } else {
            QuizMode::Mock
        };
        let pool = quiz_pool(questions, mode, request.category.as_deref());

        let picked = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            sample(&pool, request.count, &mut *rng)
        };
        Ok(picked.into_iter().map(Flashcard::from_question).collect())
    }
}
