use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use civics_core::model::Evaluation;

use super::{EvaluationRequest, Evaluator};
use crate::error::EvaluationError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You grade answers to U.S. citizenship (civics) test questions. \
Judge whether the answer shows the right concept. Ignore letter case, spelling mistakes, \
grammar slips and harmless differences in wording. Accept synonyms and equivalent phrasing. \
Numbers may be written in words or digits. Reply with a JSON object of the form \
{\"isCorrect\": boolean, \"feedback\": string} and nothing else.";

#[derive(Clone, Debug)]
pub struct AiEvaluatorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiEvaluatorConfig {
    /// Build a config from a key lookup; `None` without a non-blank API key.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup("CIVICS_AI_API_KEY")?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = lookup("CIVICS_AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = lookup("CIVICS_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Grades answers by asking a chat-completions model for a JSON verdict.
#[derive(Clone)]
pub struct AiEvaluator {
    client: Client,
    config: Option<AiEvaluatorConfig>,
}

impl AiEvaluator {
    #[must_use]
    pub fn new(config: Option<AiEvaluatorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

fn user_prompt(request: &EvaluationRequest) -> String {
    let acceptable = request
        .acceptable_answers
        .iter()
        .map(|answer| format!("\"{answer}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Question: \"{}\"\nUser's answer: \"{}\"\nAcceptable answers: {acceptable}",
        request.question, request.user_answer
    )
}

/// Models sometimes wrap the object in a fenced code block.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_verdict(content: &str) -> Result<Evaluation, EvaluationError> {
    serde_json::from_str(strip_code_fence(content))
        .map_err(|err| EvaluationError::Decode(err.to_string()))
}

#[async_trait]
impl Evaluator for AiEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> Result<Evaluation, EvaluationError> {
        let config = self.config.as_ref().ok_or(EvaluationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(request),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EvaluationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(EvaluationError::EmptyResponse)?;

        parse_verdict(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
