use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use civics_core::model::{Evaluation, Question};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use services::{
    AiEvaluator, AiEvaluatorConfig, EvaluationError, EvaluationRequest, Evaluator, FallbackEvaluator, FlashcardProvider,
    FlashcardRequest, HttpEvaluator, HttpFlashcardProvider, HttpQuestionRepository,
    MatchingEvaluator, ProviderError, QuestionBank, RemoteServer,
};
use storage::repository::{QuestionRepository, StorageError};

fn server_questions() -> Vec<Question> {
    vec![
        Question::new("What is the supreme law of the land?", ["the Constitution"], "Government"),
        Question::new("Who was the first President?", ["George Washington"], "History"),
        Question::new("What is the capital of the United States?", ["Washington, D.C."], "Geography"),
    ]
}

async fn evaluate(Json(body): Json<Value>) -> Json<Value> {
    let answer = body["userAnswer"].as_str().unwrap_or_default().to_lowercase();
    let correct = body["acceptableAnswers"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .any(|accepted| accepted.to_lowercase() == answer);
    let feedback = if correct { "Correct!" } else { "Not quite." };
    Json(json!({ "isCorrect": correct, "feedback": feedback }))
}

async fn sample(Query(params): Query<HashMap<String, String>>) -> Json<Vec<Question>> {
    let count = params
        .get("count")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(10);
    let questions = server_questions()
        .into_iter()
        .filter(|q| params.get("category").is_none_or(|c| &q.category == c))
        .take(count)
        .collect();
    Json(questions)
}

async fn spawn(app: Router) -> RemoteServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    RemoteServer::new(format!("http://{addr}"))
}

async fn quiz_server() -> RemoteServer {
    let app = Router::new()
        .route("/questions.json", get(|| async { Json(server_questions()) }))
        .route(
            "/api/categories",
            get(|| async { Json(vec!["Geography", "Government", "History"]) }),
        )
        .route("/api/evaluate", post(evaluate))
        .route("/api/questions", get(sample));
    spawn(app).await
}

async fn broken_server() -> RemoteServer {
    let app = Router::new()
        .route("/questions.json", get(|| async { "not json" }))
        .route(
            "/api/categories",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/evaluate",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        )
        .route(
            "/api/questions",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    spawn(app).await
}

#[tokio::test]
async fn bank_loads_questions_and_categories_from_server() {
    let server = quiz_server().await;
    let bank = QuestionBank::new();
    bank.load(&HttpQuestionRepository::new(server)).await.unwrap();

    assert_eq!(bank.questions().unwrap(), server_questions().as_slice());
    assert_eq!(
        bank.categories().unwrap().to_vec(),
        vec!["Geography".to_string(), "Government".into(), "History".into()]
    );
}

#[tokio::test]
async fn bank_stays_unloaded_when_server_fails() {
    let server = broken_server().await;
    let repo = HttpQuestionRepository::new(server);
    let bank = QuestionBank::new();

    assert!(bank.load(&repo).await.is_err());
    assert!(!bank.is_ready());

    assert!(matches!(
        repo.load_questions().await.unwrap_err(),
        StorageError::Serialization(_)
    ));
    assert!(matches!(
        repo.load_categories().await.unwrap_err(),
        StorageError::Connection(_)
    ));
}

#[tokio::test]
async fn evaluator_posts_camel_case_request() {
    let evaluator = HttpEvaluator::new(quiz_server().await);
    let question = Question::new("Who was the first President?", ["George Washington"], "History");

    let verdict = evaluator
        .evaluate(&EvaluationRequest::new(&question, "george washington"))
        .await
        .unwrap();
    assert_eq!(verdict, Evaluation::correct("Correct!"));

    let verdict = evaluator
        .evaluate(&EvaluationRequest::new(&question, "Lincoln"))
        .await
        .unwrap();
    assert!(!verdict.is_correct);
}

#[tokio::test]
async fn evaluator_reports_status_and_fallback_recovers() {
    let server = broken_server().await;
    let question = Question::new("Who was the first President?", ["George Washington"], "History");
    let request = EvaluationRequest::new(&question, "Washington");

    let http = Arc::new(HttpEvaluator::new(server));
    let err = http.evaluate(&request).await.unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::HttpStatus(status) if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
    ));

    let fallback = FallbackEvaluator::new(http, Arc::new(MatchingEvaluator::new()));
    let verdict = fallback.evaluate(&request).await.unwrap();
    assert!(verdict.is_correct);
}

#[tokio::test]
async fn flashcards_are_built_from_sampled_questions() {
    let provider = HttpFlashcardProvider::new(quiz_server().await);

    let cards = provider
        .fetch(&FlashcardRequest::new(5, Some("History")))
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].front, "Who was the first President?");
    assert_eq!(cards[0].back, "George Washington");
    assert_eq!(cards[0].category, "History");

    let cards = provider.fetch(&FlashcardRequest::new(2, None)).await.unwrap();
    assert_eq!(cards.len(), 2);
}

#[tokio::test]
async fn flashcard_provider_reports_status() {
    let provider = HttpFlashcardProvider::new(broken_server().await);
    let err = provider
        .fetch(&FlashcardRequest::new(3, None))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::HttpStatus(_)));
}

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer sk-test");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    if body["response_format"]["type"] != "json_object" || body["model"] != "gpt-4o-mini" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad request" })));
    }
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    let content = if user.contains("User's answer: \"Washington\"") {
        r#"{"isCorrect": true, "feedback": "Right"}"#
    } else {
        r#"{"isCorrect": false, "feedback": "Wrong"}"#
    };
    let reply = json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] });
    (StatusCode::OK, Json(reply))
}

fn ai_evaluator(server: &RemoteServer, api_key: &str) -> AiEvaluator {
    AiEvaluator::new(Some(AiEvaluatorConfig {
        base_url: server.endpoint("v1"),
        api_key: api_key.into(),
        model: "gpt-4o-mini".into(),
    }))
}

fn president_request(answer: &str) -> EvaluationRequest {
    let question = Question::new("Who was the first President?", ["George Washington"], "History");
    EvaluationRequest::new(&question, answer)
}

#[tokio::test]
async fn ai_evaluator_decodes_model_verdict() {
    let server = spawn(Router::new().route("/v1/chat/completions", post(chat_completions))).await;
    let evaluator = ai_evaluator(&server, "sk-test");

    let verdict = evaluator.evaluate(&president_request("Washington")).await.unwrap();
    assert_eq!(
        verdict,
        Evaluation {
            is_correct: true,
            feedback: "Right".into(),
        }
    );

    let verdict = evaluator.evaluate(&president_request("Lincoln")).await.unwrap();
    assert!(!verdict.is_correct);
    assert_eq!(verdict.feedback, "Wrong");
}

#[tokio::test]
async fn ai_evaluator_reports_rejected_key() {
    let server = spawn(Router::new().route("/v1/chat/completions", post(chat_completions))).await;
    let err = ai_evaluator(&server, "sk-wrong")
        .evaluate(&president_request("Washington"))
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluationError::HttpStatus(status) if status == StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn ai_evaluator_reports_server_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "overloaded") }),
    );
    let server = spawn(app).await;
    let err = ai_evaluator(&server, "sk-test")
        .evaluate(&president_request("Washington"))
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluationError::HttpStatus(status) if status.is_server_error()));
}

#[tokio::test]
async fn ai_evaluator_rejects_empty_choices() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let server = spawn(app).await;
    let err = ai_evaluator(&server, "sk-test")
        .evaluate(&president_request("Washington"))
        .await
        .unwrap_err();
    assert!(matches!(err, EvaluationError::EmptyResponse));
}
