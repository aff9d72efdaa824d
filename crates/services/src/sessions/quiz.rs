use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use civics_core::Clock;
use civics_core::model::{Question, QuizMode, QuizResults, UserAnswerRecord, percentage};

use super::progress::SessionProgress;
use super::view::{QuestionView, QuizStep, SessionPhase, SubmitOutcome};
use crate::error::SessionError;
use crate::evaluation::{EvaluationRequest, Evaluator};
use crate::question_bank::QuestionBank;
use crate::selection::select_quiz_questions;

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// One quiz run. `questions` is fixed when the quiz starts.
///
/// `score` always equals the number of correct entries in `answers`, and
/// `answers` holds either `current` or `current + 1` records.
struct QuizSession {
    mode: QuizMode,
    category: Option<String>,
    questions: Vec<Question>,
    current: usize,
    score: usize,
    answers: Vec<UserAnswerRecord>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    fn is_current_answered(&self) -> bool {
        self.answers.len() > self.current
    }

    fn view(&self) -> Option<QuestionView> {
        let question = self.current_question()?;
        let total = self.questions.len();
        Some(QuestionView {
            index: self.current,
            number: self.current + 1,
            total,
            question: question.question.clone(),
            category: question.category.clone(),
            progress_percent: percentage(self.current + 1, total),
        })
    }
}

enum QuizState {
    Idle,
    InProgress(QuizSession),
    Terminal {
        session: QuizSession,
        results: QuizResults,
    },
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives a short-answer quiz: `Idle → InProgress → Terminal`.
///
/// Operations run one at a time; `submit_answer` holds `&mut self` across the
/// evaluation request, so a second submission cannot start while one is pending.
/// Any failed call leaves the session exactly as it was.
pub struct QuizController {
    bank: Arc<QuestionBank>,
    evaluator: Arc<dyn Evaluator>,
    clock: Clock,
    rng: StdRng,
    state: QuizState,
}

impl QuizController {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            bank,
            evaluator,
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
            state: QuizState::Idle,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Make question selection deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Start a fresh quiz, replacing any previous session.
    ///
    /// Mock mode ignores `category`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotReady` while questions are loading; the
    /// previous session is kept then. Otherwise the previous session is
    /// discarded first, so `SessionError::EmptySelection` leaves the
    /// controller `Idle`.
    pub fn start_quiz(
        &mut self,
        mode: QuizMode,
        category: Option<&str>,
    ) -> Result<QuestionView, SessionError> {
        let questions = self.bank.questions().ok_or(SessionError::NotReady)?;
        self.state = QuizState::Idle;
        let category = match mode {
            QuizMode::Mock => None,
            QuizMode::Category => category.map(ToString::to_string),
        };

        let selected =
            select_quiz_questions(questions, mode, category.as_deref(), &mut self.rng);
        if selected.is_empty() {
            tracing::info!(%mode, ?category, "no questions for quiz selection");
            return Err(SessionError::EmptySelection);
        }

        let session = QuizSession {
            mode,
            category,
            questions: selected,
            current: 0,
            score: 0,
            answers: Vec::new(),
            started_at: self.clock.now(),
        };
        let view = session.view().ok_or(SessionError::EmptySelection)?;
        tracing::info!(%mode, category = ?session.category, total = view.total, "quiz started");

        self.state = QuizState::InProgress(session);
        Ok(view)
    }

    /// Grade an answer to the current question.
    ///
    /// The answer is trimmed before grading. On success the answer is recorded
    /// and the score updated; the quiz stays on this question until
    /// [`QuizController::next_question`].
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyInput` for a blank answer (the evaluator is not called).
    /// - `SessionError::AlreadyAnswered` if the current question has a verdict.
    /// - `SessionError::EvaluationUnavailable` if grading failed; the same
    ///   question can be submitted again.
    /// - `SessionError::NoActiveSession` outside a running quiz.
    pub async fn submit_answer(&mut self, user_answer: &str) -> Result<SubmitOutcome, SessionError> {
        let session = self.in_progress()?;
        let answer = user_answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if session.is_current_answered() {
            return Err(SessionError::AlreadyAnswered);
        }
        let question = session
            .current_question()
            .ok_or(SessionError::NoActiveSession)?
            .clone();

        let request = EvaluationRequest::new(&question, answer);
        let evaluation = self.evaluator.evaluate(&request).await.map_err(|err| {
            tracing::warn!(error = %err, "answer evaluation failed");
            SessionError::EvaluationUnavailable(err)
        })?;

        let session = self.in_progress_mut()?;
        if evaluation.is_correct {
            session.score += 1;
        }
        let is_last = session.current + 1 == session.questions.len();
        let acceptable_answers = question.answer.clone();
        session
            .answers
            .push(UserAnswerRecord::new(question, answer, evaluation.clone()));
        tracing::debug!(
            index = session.current,
            correct = evaluation.is_correct,
            score = session.score,
            "answer recorded"
        );

        Ok(SubmitOutcome {
            evaluation,
            acceptable_answers,
            score: session.score,
            is_last,
        })
    }

    /// Move past an answered question; finishes the quiz after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` if the current question has no verdict
    /// yet, or `SessionError::NoActiveSession` outside a running quiz.
    pub fn next_question(&mut self) -> Result<QuizStep, SessionError> {
        let session = self.in_progress_mut()?;
        if !session.is_current_answered() {
            return Err(SessionError::NotAnswered);
        }

        session.current += 1;
        if let Some(view) = session.view() {
            return Ok(QuizStep::Question(view));
        }

        let completed_at = self.clock.now();
        let QuizState::InProgress(session) = std::mem::replace(&mut self.state, QuizState::Idle)
        else {
            return Err(SessionError::NoActiveSession);
        };
        let results = QuizResults::from_answers(
            &session.answers,
            session.questions.len(),
            session.started_at,
            completed_at,
        );
        tracing::info!(
            score = results.score,
            total = results.total,
            percentage = results.percentage,
            "quiz finished"
        );
        self.state = QuizState::Terminal {
            session,
            results: results.clone(),
        };
        Ok(QuizStep::Finished(results))
    }

    /// Final score of a finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ResultsUnavailable` unless the quiz is finished.
    pub fn results(&self) -> Result<&QuizResults, SessionError> {
        match &self.state {
            QuizState::Terminal { results, .. } => Ok(results),
            _ => Err(SessionError::ResultsUnavailable),
        }
    }

    /// Incorrectly answered records in the order they were submitted.
    #[must_use]
    pub fn incorrect_for_review(&self) -> Vec<&UserAnswerRecord> {
        self.answers().iter().filter(|a| !a.is_correct).collect()
    }

    /// Every recorded answer in submission order.
    #[must_use]
    pub fn answers(&self) -> &[UserAnswerRecord] {
        self.session().map_or(&[], |s| s.answers.as_slice())
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.session().map_or(0, |s| s.score)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<QuestionView> {
        match &self.state {
            QuizState::InProgress(session) => session.view(),
            _ => None,
        }
    }

    /// Whether the current question already has a verdict.
    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        matches!(&self.state, QuizState::InProgress(s) if s.is_current_answered())
    }

    #[must_use]
    pub fn mode(&self) -> Option<QuizMode> {
        self.session().map(|s| s.mode)
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.session().and_then(|s| s.category.as_deref())
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            QuizState::Idle => SessionPhase::Idle,
            QuizState::InProgress(_) => SessionPhase::InProgress,
            QuizState::Terminal { .. } => SessionPhase::Terminal,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session().map(|s| {
            SessionProgress::new(
                s.questions.len(),
                s.answers.len(),
                matches!(self.state, QuizState::Terminal { .. }),
            )
        })
    }

    /// Discard the session and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = QuizState::Idle;
    }

    /// Abandon the current quiz. Confirmation is the caller's job.
    pub fn quit(&mut self) {
        if let QuizState::InProgress(session) = &self.state {
            tracing::info!(answered = session.answers.len(), "quiz abandoned");
        }
        self.reset();
    }

    fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            QuizState::Idle => None,
            QuizState::InProgress(session) | QuizState::Terminal { session, .. } => Some(session),
        }
    }

    fn in_progress(&self) -> Result<&QuizSession, SessionError> {
        match &self.state {
            QuizState::InProgress(session) => Ok(session),
            _ => Err(SessionError::NoActiveSession),
        }
    }

    fn in_progress_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        match &mut self.state {
            QuizState::InProgress(session) => Ok(session),
            _ => Err(SessionError::NoActiveSession),
        }
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session();
        f.debug_struct("QuizController")
            .field("phase", &self.phase())
            .field("questions_len", &session.map(|s| s.questions.len()))
            .field("current", &session.map(|s| s.current))
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
