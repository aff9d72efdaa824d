use std::error::Error;

use civics_core::model::{QUIZ_LENGTH, QuizMode, QuizResults};
use services::{
    AppServices, FlashcardController, FlashcardStep, QuestionView, QuizController, QuizStep,
    SessionError,
};

use crate::console::Console;

type AppResult<T> = Result<T, Box<dyn Error>>;

const QUIT: &str = ":q";

pub async fn main_menu(console: &mut Console, services: &AppServices) -> AppResult<()> {
    if !load_questions(console, services).await? {
        return Ok(());
    }

    let mut quiz = services.quiz();
    let mut cards = services.flashcards();
    loop {
        console.header("U.S. Civics Quiz");
        console.line("1) Mock test (10 random questions)");
        console.line("2) Category test");
        console.line("3) Flashcards");
        console.line("4) Toggle theme");
        console.line("5) Quit");

        let Some(choice) = console.choose(">", 5).await? else {
            return Ok(());
        };
        match choice {
            1 => start_quiz(console, &mut quiz, QuizMode::Mock, None).await?,
            2 => {
                if let Some(category) = pick_category(console, services, false).await? {
                    start_quiz(console, &mut quiz, QuizMode::Category, category.as_deref()).await?;
                }
            }
            3 => {
                if let Some(category) = pick_category(console, services, true).await? {
                    run_flashcards(console, &mut cards, category.as_deref()).await?;
                }
            }
            4 => {
                let theme = services.app_settings().toggle_theme().await?;
                console.set_theme(theme);
                console.line(format!("Theme set to {}.", console.theme()));
            }
            _ => return Ok(()),
        }
    }
}

/// Returns `false` when the user gives up after a failed load.
async fn load_questions(console: &mut Console, services: &AppServices) -> AppResult<bool> {
    loop {
        console.line("Loading questions...");
        match services.load_questions().await {
            Ok(()) => return Ok(true),
            Err(err) => {
                console.failure(format!("Could not load questions: {err}"));
                if !console.confirm("Retry?").await? {
                    return Ok(false);
                }
            }
        }
    }
}

/// `Some(None)` means every category; `None` means the user backed out.
async fn pick_category(
    console: &mut Console,
    services: &AppServices,
    allow_all: bool,
) -> AppResult<Option<Option<String>>> {
    let categories = services.bank().categories().map(<[String]>::to_vec).unwrap_or_default();
    if categories.is_empty() && !allow_all {
        console.failure("No categories available.");
        return Ok(None);
    }

    console.header("Choose a category");
    let mut offset = 0;
    if allow_all {
        console.line("1) All categories");
        offset = 1;
    }
    for (i, category) in categories.iter().enumerate() {
        console.line(format!("{}) {category}", i + 1 + offset));
    }

    let Some(choice) = console.choose(">", categories.len() + offset).await? else {
        return Ok(None);
    };
    if allow_all && choice == 1 {
        return Ok(Some(None));
    }
    Ok(categories.get(choice - 1 - offset).cloned().map(Some))
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

async fn start_quiz(
    console: &mut Console,
    quiz: &mut QuizController,
    mode: QuizMode,
    category: Option<&str>,
) -> AppResult<()> {
    match quiz.start_quiz(mode, category) {
        Ok(first) => run_quiz(console, quiz, first).await,
        Err(err @ (SessionError::EmptySelection | SessionError::NotReady)) => {
            console.failure(err.to_string());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_quiz(
    console: &mut Console,
    quiz: &mut QuizController,
    first: QuestionView,
) -> AppResult<()> {
    let mut view = first;
    loop {
        console.header(&format!(
            "Question {} of {} ({}%)",
            view.number, view.total, view.progress_percent
        ));
        console.line(format!("[{}]", view.category));
        console.line(&view.question);

        let Some(answer) = console.prompt(&format!("Your answer ({QUIT} to quit):")).await? else {
            quiz.quit();
            return Ok(());
        };
        if answer == QUIT {
            if console.confirm("Quit this quiz? Progress will be lost.").await? {
                quiz.quit();
                return Ok(());
            }
            continue;
        }

        let outcome = match quiz.submit_answer(&answer).await {
            Ok(outcome) => outcome,
            Err(SessionError::EmptyInput) => {
                console.failure("Please type an answer first.");
                continue;
            }
            Err(err) if err.is_retryable() => {
                console.failure(format!("{err}. Please try again."));
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if outcome.evaluation.is_correct {
            console.success(format!("Correct! {}", outcome.evaluation.feedback));
        } else {
            console.failure(format!("Incorrect. {}", outcome.evaluation.feedback));
            console.line(format!(
                "Acceptable answers: {}",
                outcome.acceptable_answers.join("; ")
            ));
        }
        console.line(format!("Score: {}", outcome.score));

        let label = if outcome.is_last {
            "Press Enter to see results"
        } else {
            "Press Enter for the next question"
        };
        if console.prompt(label).await?.is_none() {
            quiz.quit();
            return Ok(());
        }

        match quiz.next_question()? {
            QuizStep::Question(next) => view = next,
            QuizStep::Finished(results) => {
                show_results(console, &results);
                return review(console, quiz).await;
            }
        }
    }
}

fn show_results(console: &Console, results: &QuizResults) {
    console.header("Results");
    console.line(format!(
        "You scored {} out of {} ({}%)",
        results.score, results.total, results.percentage
    ));
    for category in &results.categories {
        console.line(format!(
            "  {}: {}/{} ({}%)",
            category.category, category.correct, category.total, category.percentage
        ));
    }
}

async fn review(console: &mut Console, quiz: &QuizController) -> AppResult<()> {
    let incorrect = quiz.incorrect_for_review();
    if incorrect.is_empty() || !console.confirm("Review incorrect answers?").await? {
        return Ok(());
    }

    console.header("Review");
    for (i, record) in incorrect.iter().enumerate() {
        console.line(format!("{}. {}", i + 1, record.question.question));
        console.failure(format!("   Your answer: {}", record.user_answer));
        console.success(format!(
            "   Correct answers: {}",
            record.question.answer.join("; ")
        ));
        console.line(format!("   {}", record.feedback));
    }
    Ok(())
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

async fn run_flashcards(
    console: &mut Console,
    cards: &mut FlashcardController,
    category: Option<&str>,
) -> AppResult<()> {
    let count = loop {
        let Some(raw) = console
            .prompt(&format!("How many cards? (default {QUIZ_LENGTH})"))
            .await?
        else {
            return Ok(());
        };
        if raw.is_empty() {
            break QUIZ_LENGTH;
        }
        match raw.parse::<usize>() {
            Ok(count) if count > 0 => break count,
            _ => console.failure("Enter a positive number."),
        }
    };

    let mut card = match cards.start_flashcards(count, category).await {
        Ok(card) => card,
        Err(err) if err.is_retryable() || matches!(err, SessionError::EmptySelection) => {
            console.failure(err.to_string());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    loop {
        console.header(&format!("Card {} of {}", card.number, card.total));
        console.line(format!("[{}]", card.category));
        console.line(&card.front);

        let Some(input) = console.prompt("[f] flip, [q] quit:").await? else {
            cards.quit();
            return Ok(());
        };
        match input.to_ascii_lowercase().as_str() {
            "f" => {}
            "q" => {
                if console.confirm("Stop studying?").await? {
                    cards.quit();
                    return Ok(());
                }
                continue;
            }
            _ => continue,
        }

        if let Some(flipped) = cards.flip()? {
            console.line(format!("Answer: {}", flipped.back.unwrap_or_default()));
        }

        let correct = loop {
            let Some(input) = console.prompt("Did you know it? [y/n]:").await? else {
                cards.quit();
                return Ok(());
            };
            match input.to_ascii_lowercase().as_str() {
                "y" | "yes" => break true,
                "n" | "no" => break false,
                _ => {}
            }
        };

        match cards.mark(correct)? {
            FlashcardStep::Card(next) => card = next,
            FlashcardStep::Finished(results) => {
                console.header("Flashcard results");
                console.success(format!("Knew it: {}", results.correct));
                console.failure(format!("Still learning: {}", results.incorrect));
                console.line(format!(
                    "Accuracy: {}% of {} cards",
                    results.accuracy, results.total
                ));
                return Ok(());
            }
        }
    }
}
