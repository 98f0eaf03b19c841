//! Seams to the text-generation service and the usage tracker.
//!
//! The core never talks to an LLM directly. Generative agents hand a list of
//! [`ChatMessage`]s to a [`TextGenerator`] and get new text back; errors from
//! that boundary propagate as [`AgentError::Generation`].

#[cfg(feature = "openai-api")]
pub mod openai;

#[cfg(feature = "openai-api")]
pub use openai::OpenAIGenerator;

use crate::agent::AgentError;
use crate::message::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Sampling parameters forwarded to the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// The opaque chat-completion call: role-tagged messages in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, AgentError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// Reports the cumulative cost spent on generation so far.
pub trait UsageTracker: Send + Sync {
    fn current_cost(&self) -> f64;
}

/// Token and cost totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub requests: u64,
    pub cost: f64,
}

/// A thread-safe running total of [`Usage`], shared between generators.
#[derive(Debug, Default)]
pub struct UsageLedger {
    usage: Mutex<Usage>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one request.
    pub fn record(&self, prompt_tokens: u64, completion_tokens: u64, cost: f64) {
        let mut usage = self.usage.lock().unwrap_or_else(|e| e.into_inner());
        usage.prompt_tokens += prompt_tokens;
        usage.completion_tokens += completion_tokens;
        usage.requests += 1;
        usage.cost += cost;
    }

    pub fn snapshot(&self) -> Usage {
        *self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UsageTracker for UsageLedger {
    fn current_cost(&self) -> f64 {
        self.snapshot().cost
    }
}
