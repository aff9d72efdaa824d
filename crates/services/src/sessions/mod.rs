mod flashcards;
mod progress;
mod quiz;
mod view;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use flashcards::FlashcardController;
pub use progress::SessionProgress;
pub use quiz::QuizController;
pub use view::{
    CardView, FlashcardStep, FlashcardTally, QuestionView, QuizStep, SessionPhase, SubmitOutcome,
};
