use std::fmt;

/// Maximum number of questions asked in one quiz.
pub const QUIZ_LENGTH: usize = 10;

/// Which pool a quiz draws its questions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    /// The entire question set regardless of category.
    Mock,
    /// Only questions in one chosen category.
    Category,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Mock => f.write_str("mock"),
            QuizMode::Category => f.write_str("category"),
        }
    }
}
