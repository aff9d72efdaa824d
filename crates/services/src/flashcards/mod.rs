//! Flashcard sources: the quiz server or the locally loaded question bank.

mod http;
mod local;

use async_trait::async_trait;

use civics_core::model::Flashcard;

use crate::error::ProviderError;

pub use http::HttpFlashcardProvider;
pub use local::BankFlashcardProvider;

/// How many cards to study and from which category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardRequest {
    pub count: usize,
    pub category: Option<String>,
}

impl FlashcardRequest {
    #[must_use]
    pub fn new(count: usize, category: Option<&str>) -> Self {
        Self {
            count,
            category: category.map(ToString::to_string),
        }
    }
}

/// Supplies an already shuffled deck of at most `count` cards.
///
/// When fewer cards match than were requested, the available subset is returned.
#[async_trait]
pub trait FlashcardProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns `ProviderError` when the deck cannot be fetched.
    async fn fetch(&self, request: &FlashcardRequest) -> Result<Vec<Flashcard>, ProviderError>;
}
