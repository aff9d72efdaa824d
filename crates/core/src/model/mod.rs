mod app_settings;
mod evaluation;
mod flashcard;
mod question;
mod quiz;
mod results;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError, Theme};
pub use evaluation::{Evaluation, UserAnswerRecord};
pub use flashcard::Flashcard;
pub use question::{Question, QuestionError};
pub use quiz::{QUIZ_LENGTH, QuizMode};
pub use results::{CategoryScore, FlashcardResults, QuizResults, category_breakdown, percentage};
