//! A prompted LLM agent.

use crate::agent::{Agent, AgentError};
use crate::dialogue::Dialogue;
use crate::llm::{GenerationParams, TextGenerator};
use crate::message::{FormatOptions, format_as_messages};
use async_trait::async_trait;
use std::sync::Arc;

/// An agent that asks a text generator for its next turn.
///
/// The dialogue is converted with [`format_as_messages`], speaking as this
/// agent's name, with the configured system prompt injected as the leading
/// system message.
///
/// # Example
///
/// ```rust,ignore
/// use argubot::agent::LLMAgent;
///
/// let alice = LLMAgent::new("Alice", generator)
///     .with_system("You are an intelligent bot who wants to broaden your user's mind. \
///                   Ask a conversation starter question. Then, WHATEVER position the \
///                   user initially takes, push back on it.");
/// ```
#[derive(Clone)]
pub struct LLMAgent {
    name: String,
    system: Option<String>,
    format: FormatOptions,
    params: GenerationParams,
    generator: Arc<dyn TextGenerator>,
}

impl LLMAgent {
    pub fn new(name: impl Into<String>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            name: name.into(),
            system: None,
            format: FormatOptions::default(),
            params: GenerationParams::default(),
            generator,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Overrides how the dialogue is formatted. Its `system` field is ignored
    /// in favour of [`LLMAgent::with_system`].
    pub fn with_format_options(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }
}

impl std::fmt::Debug for LLMAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMAgent")
            .field("name", &self.name)
            .field("model", &self.generator.model_name())
            .field("system", &self.system)
            .finish()
    }
}

#[async_trait]
impl Agent for LLMAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError> {
        let options = FormatOptions {
            system: self.system.clone(),
            ..self.format.clone()
        };
        let messages = format_as_messages(dialogue, &self.name, &options);
        tracing::trace!(agent = %self.name, ?messages, "calling text generator");

        let content = self.generator.generate(&messages, &self.params).await?;
        tracing::debug!(agent = %self.name, model = self.generator.model_name(), "generated reply");
        Ok(content)
    }
}
