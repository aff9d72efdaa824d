use std::fmt;
use std::sync::Arc;

use civics_core::model::{Flashcard, FlashcardResults};

use super::progress::SessionProgress;
use super::view::{CardView, FlashcardStep, FlashcardTally, SessionPhase};
use crate::error::{ProviderError, SessionError};
use crate::flashcards::{FlashcardProvider, FlashcardRequest};
use crate::question_bank::QuestionBank;

struct FlashcardSession {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
    tally: FlashcardTally,
}

impl FlashcardSession {
    fn view(&self) -> Option<CardView> {
        let card = self.cards.get(self.current)?;
        Some(CardView {
            index: self.current,
            number: self.current + 1,
            total: self.cards.len(),
            front: card.front.clone(),
            category: card.category.clone(),
            back: self.flipped.then(|| card.back.clone()),
        })
    }
}

enum FlashcardState {
    Idle,
    InProgress(FlashcardSession),
    Terminal(FlashcardResults),
}

/// Drives a flip-and-self-grade flashcard run: `Idle → InProgress → Terminal`.
///
/// `correct + incorrect` always equals the number of cards already marked.
pub struct FlashcardController {
    bank: Arc<QuestionBank>,
    provider: Arc<dyn FlashcardProvider>,
    state: FlashcardState,
}

impl FlashcardController {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, provider: Arc<dyn FlashcardProvider>) -> Self {
        Self {
            bank,
            provider,
            state: FlashcardState::Idle,
        }
    }

    /// Fetch a deck and show its first card face down.
    ///
    /// `category` of `None` draws from every category.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidCount` when `count` is zero.
    /// - `SessionError::NotReady` while the question bank is still loading.
    /// - `SessionError::FlashcardsUnavailable` when the provider fails.
    /// - `SessionError::EmptySelection` when no card matches.
    ///
    /// The previous session is kept on every error.
    pub async fn start_flashcards(
        &mut self,
        count: usize,
        category: Option<&str>,
    ) -> Result<CardView, SessionError> {
        if count == 0 {
            return Err(SessionError::InvalidCount);
        }
        if !self.bank.is_ready() {
            return Err(SessionError::NotReady);
        }

        let request = FlashcardRequest::new(count, category);
        let mut cards = self.provider.fetch(&request).await.map_err(|err| match err {
            ProviderError::NotReady => SessionError::NotReady,
            other => {
                tracing::warn!(error = %other, "flashcard fetch failed");
                SessionError::FlashcardsUnavailable(other)
            }
        })?;
        cards.truncate(count);
        if cards.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        tracing::info!(requested = count, received = cards.len(), ?category, "flashcards started");
        let session = FlashcardSession {
            cards,
            current: 0,
            flipped: false,
            tally: FlashcardTally::default(),
        };
        let view = session.view().ok_or(SessionError::EmptySelection)?;
        self.state = FlashcardState::InProgress(session);
        Ok(view)
    }

    /// Reveal the back of the current card.
    ///
    /// Returns `None` when the card was already flipped; nothing changes then.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` outside a running deck.
    pub fn flip(&mut self) -> Result<Option<CardView>, SessionError> {
        let session = self.in_progress_mut()?;
        if session.flipped {
            return Ok(None);
        }
        session.flipped = true;
        Ok(session.view())
    }

    /// Record the self-assessment for the flipped card and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFlipped` if the card is still face down, or
    /// `SessionError::NoActiveSession` outside a running deck.
    pub fn mark(&mut self, correct: bool) -> Result<FlashcardStep, SessionError> {
        let session = self.in_progress_mut()?;
        if !session.flipped {
            return Err(SessionError::NotFlipped);
        }

        if correct {
            session.tally.correct += 1;
        } else {
            session.tally.incorrect += 1;
        }
        session.current += 1;
        session.flipped = false;

        if let Some(view) = session.view() {
            return Ok(FlashcardStep::Card(view));
        }

        let results = FlashcardResults::new(session.tally.correct, session.tally.incorrect);
        tracing::info!(
            correct = results.correct,
            incorrect = results.incorrect,
            accuracy = results.accuracy,
            "flashcards finished"
        );
        self.state = FlashcardState::Terminal(results);
        Ok(FlashcardStep::Finished(results))
    }

    #[must_use]
    pub fn current_card(&self) -> Option<CardView> {
        match &self.state {
            FlashcardState::InProgress(session) => session.view(),
            _ => None,
        }
    }

    /// Marks so far; zero outside a running deck.
    #[must_use]
    pub fn tally(&self) -> FlashcardTally {
        match &self.state {
            FlashcardState::InProgress(session) => session.tally,
            FlashcardState::Terminal(results) => FlashcardTally {
                correct: results.correct,
                incorrect: results.incorrect,
            },
            FlashcardState::Idle => FlashcardTally::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::ResultsUnavailable` unless every card was marked.
    pub fn results(&self) -> Result<FlashcardResults, SessionError> {
        match &self.state {
            FlashcardState::Terminal(results) => Ok(*results),
            _ => Err(SessionError::ResultsUnavailable),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            FlashcardState::Idle => SessionPhase::Idle,
            FlashcardState::InProgress(_) => SessionPhase::InProgress,
            FlashcardState::Terminal(_) => SessionPhase::Terminal,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        match &self.state {
            FlashcardState::Idle => None,
            FlashcardState::InProgress(session) => {
                Some(SessionProgress::new(session.cards.len(), session.current, false))
            }
            FlashcardState::Terminal(results) => {
                Some(SessionProgress::new(results.total, results.total, true))
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = FlashcardState::Idle;
    }

    /// Abandon the deck without results.
    pub fn quit(&mut self) {
        if let FlashcardState::InProgress(session) = &self.state {
            tracing::info!(marked = session.current, "flashcards abandoned");
        }
        self.reset();
    }

    fn in_progress_mut(&mut self) -> Result<&mut FlashcardSession, SessionError> {
        match &mut self.state {
            FlashcardState::InProgress(session) => Ok(session),
            _ => Err(SessionError::NoActiveSession),
        }
    }
}

impl fmt::Debug for FlashcardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardController")
            .field("phase", &self.phase())
            .field("tally", &self.tally())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question_bank::Catalog;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed deck, optionally failing or short.
    struct FixedProvider {
        cards: Vec<Flashcard>,
        fail: Mutex<Option<ProviderError>>,
        requests: Mutex<Vec<FlashcardRequest>>,
    }

    impl FixedProvider {
        fn new(len: usize) -> Self {
            Self {
                cards: (0..len)
                    .map(|i| Flashcard::new(format!("Front {i}"), format!("Back {i}"), "Symbols"))
                    .collect(),
                fail: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FlashcardProvider for FixedProvider {
        async fn fetch(&self, request: &FlashcardRequest) -> Result<Vec<Flashcard>, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(err) = self.fail.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.cards.iter().take(request.count).cloned().collect())
        }
    }

    fn controller(len: usize) -> (FlashcardController, Arc<FixedProvider>) {
        let provider = Arc::new(FixedProvider::new(len));
        let bank = Arc::new(QuestionBank::from_catalog(Catalog::default()));
        (FlashcardController::new(bank, provider.clone()), provider)
    }

    #[tokio::test]
    async fn zero_count_is_rejected_without_fetching() {
        let (mut cards, provider) = controller(3);
        let err = cards.start_flashcards(0, None).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidCount));
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unloaded_bank_is_not_ready() {
        let provider = Arc::new(FixedProvider::new(3));
        let mut cards = FlashcardController::new(Arc::new(QuestionBank::new()), provider.clone());
        let err = cards.start_flashcards(2, None).await.unwrap_err();
        assert!(matches!(err, SessionError::NotReady));
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn start_shows_first_card_face_down() {
        let (mut cards, provider) = controller(3);
        let view = cards.start_flashcards(2, Some("Symbols")).await.unwrap();
        assert_eq!(view.index, 0);
        assert_eq!(view.total, 2);
        assert_eq!(view.front, "Front 0");
        assert!(!view.is_flipped());
        assert_eq!(
            provider.requests.lock().unwrap()[0],
            FlashcardRequest::new(2, Some("Symbols"))
        );
    }

    #[tokio::test]
    async fn mark_before_flip_changes_nothing() {
        let (mut cards, _) = controller(2);
        cards.start_flashcards(2, None).await.unwrap();

        let err = cards.mark(true).unwrap_err();
        assert!(matches!(err, SessionError::NotFlipped));
        assert_eq!(cards.tally(), FlashcardTally::default());
        assert_eq!(cards.current_card().unwrap().index, 0);
    }

    #[tokio::test]
    async fn second_flip_is_a_no_op() {
        let (mut cards, _) = controller(2);
        cards.start_flashcards(2, None).await.unwrap();

        let flipped = cards.flip().unwrap().unwrap();
        assert_eq!(flipped.back.as_deref(), Some("Back 0"));
        assert!(cards.flip().unwrap().is_none());
        assert!(cards.current_card().unwrap().is_flipped());
    }

    #[tokio::test]
    async fn short_deck_runs_to_results() {
        let (mut cards, _) = controller(3);
        let view = cards.start_flashcards(5, None).await.unwrap();
        assert_eq!(view.total, 3);

        for expected in 1..=3 {
            cards.flip().unwrap();
            match cards.mark(true).unwrap() {
                FlashcardStep::Card(next) => {
                    assert_eq!(next.index, expected);
                    assert!(!next.is_flipped());
                }
                FlashcardStep::Finished(results) => {
                    assert_eq!(expected, 3);
                    assert_eq!(results, FlashcardResults::new(3, 0));
                }
            }
            let tally = cards.tally();
            assert_eq!(tally.correct + tally.incorrect, expected);
        }

        let results = cards.results().unwrap();
        assert_eq!(
            (results.correct, results.incorrect, results.total, results.accuracy),
            (3, 0, 3, 100)
        );
        assert_eq!(cards.phase(), SessionPhase::Terminal);
        assert!(matches!(cards.flip().unwrap_err(), SessionError::NoActiveSession));
    }

    #[tokio::test]
    async fn provider_failures_keep_previous_session() {
        let (mut cards, provider) = controller(2);
        cards.start_flashcards(2, None).await.unwrap();
        cards.flip().unwrap();

        *provider.fail.lock().unwrap() = Some(ProviderError::NotReady);
        let err = cards.start_flashcards(2, None).await.unwrap_err();
        assert!(matches!(err, SessionError::NotReady));
        assert!(cards.current_card().unwrap().is_flipped());

        let (mut empty, _) = controller(0);
        let err = empty.start_flashcards(4, None).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptySelection));
        assert_eq!(empty.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn quit_discards_progress() {
        let (mut cards, _) = controller(2);
        cards.start_flashcards(2, None).await.unwrap();
        cards.flip().unwrap();
        cards.mark(false).unwrap();
        assert_eq!(cards.tally().incorrect, 1);

        cards.quit();
        assert_eq!(cards.phase(), SessionPhase::Idle);
        assert!(cards.current_card().is_none());
        assert!(matches!(cards.results().unwrap_err(), SessionError::ResultsUnavailable));
    }
}
