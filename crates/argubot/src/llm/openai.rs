//! OpenAIGenerator - Direct REST client for OpenAI-compatible chat completions.
//!
//! # Example
//!
//! ```rust,no_run
//! use argubot::llm::{GenerationParams, OpenAIGenerator, TextGenerator, UsageLedger};
//! use argubot::message::ChatMessage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = Arc::new(UsageLedger::new());
//! let generator = OpenAIGenerator::try_from_env()?
//!     .with_pricing(0.15, 0.60)
//!     .with_usage_ledger(ledger.clone());
//!
//! let text = generator
//!     .generate(&[ChatMessage::user("Hello!")], &GenerationParams::default())
//!     .await?;
//! println!("{text} (spent ${:.4})", ledger.snapshot().cost);
//! # Ok(())
//! # }
//! ```

use super::{GenerationParams, TextGenerator, UsageLedger};
use crate::agent::AgentError;
use crate::message::ChatMessage;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Generator that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    /// Dollars per million (prompt, completion) tokens.
    pricing: (f64, f64),
    ledger: Option<Arc<UsageLedger>>,
}

impl OpenAIGenerator {
    /// Creates a new generator with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pricing: (0.0, 0.0),
            ledger: None,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY` (required)
    /// - `OPENAI_MODEL` (optional, defaults to `gpt-4o-mini`)
    /// - `OPENAI_BASE_URL` (optional, for OpenAI-compatible servers)
    pub fn try_from_env() -> Result<Self, AgentError> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            AgentError::Generation("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let mut generator = Self::new(api_key, model);
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            generator = generator.with_base_url(base_url);
        }
        Ok(generator)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the price in dollars per million prompt and completion tokens.
    pub fn with_pricing(mut self, prompt_per_million: f64, completion_per_million: f64) -> Self {
        self.pricing = (prompt_per_million, completion_per_million);
        self
    }

    /// Records every request's token usage and cost into `ledger`.
    pub fn with_usage_ledger(mut self, ledger: Arc<UsageLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    fn record_usage(&self, usage: Option<&UsageBody>) {
        let (Some(ledger), Some(usage)) = (&self.ledger, usage) else {
            return;
        };
        let cost = (usage.prompt_tokens as f64 * self.pricing.0
            + usage.completion_tokens as f64 * self.pricing.1)
            / 1_000_000.0;
        ledger.record(usage.prompt_tokens, usage.completion_tokens, cost);
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String, AgentError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| AgentError::Generation(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            AgentError::Generation(format!("Failed to parse OpenAI response: {err}"))
        })?;

        self.record_usage(parsed.usage.as_ref());
        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, AgentError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        tracing::debug!(model = %self.model, messages = messages.len(), "chat completion request");
        self.send_request(&request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<UsageBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, AgentError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            AgentError::Generation("OpenAI API returned no content in the response".into())
        })
}

fn map_http_error(status: StatusCode, body: String) -> AgentError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    AgentError::Generation(format!("OpenAI API returned {status}: {message}"))
}
