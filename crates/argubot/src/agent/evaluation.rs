//! Characters answering questions about a dialogue they took part in or observed.

use super::{Agent, AgentError, LLMAgent};
use crate::character::Character;
use crate::dialogue::Dialogue;
use crate::llm::{GenerationParams, TextGenerator};
use crate::prompt;
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

const EVALUATION_TEMPLATE: &str = "\
Your name is {{ name }}, and you are {{ persona }}.
{%- if conviction %} {{ conviction }}{% endif %}
{%- if languages %} You speak {{ languages | join(\", \") }}.{% endif %}

A research team is studying a conversation and will ask you questions about it. \
Answer honestly and concisely, as {{ name }} would.";

/// Why a rating reply could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("reply is not a single integer")]
    NotAnInteger,

    #[error("rating {value} is outside the range {low}-{high}")]
    OutOfRange { value: i64, low: i64, high: i64 },
}

/// The result of asking for a rating.
///
/// An unusable reply is not an error: callers drop that criterion and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingOutcome {
    Score(i64),
    Omitted { reply: String, reason: RatingError },
}

impl RatingOutcome {
    pub fn score(&self) -> Option<i64> {
        match self {
            RatingOutcome::Score(score) => Some(*score),
            RatingOutcome::Omitted { .. } => None,
        }
    }
}

static RATING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)\.?$").expect("rating pattern is a valid regex"));

/// Parses a reply that should contain nothing but an integer in `low..=high`.
///
/// Surrounding whitespace and a trailing period are tolerated.
pub fn parse_rating(reply: &str, low: i64, high: i64) -> Result<i64, RatingError> {
    let trimmed = reply.trim();
    let digits = RATING_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(RatingError::NotAnInteger)?;
    let value: i64 = digits.parse().map_err(|_| RatingError::NotAnInteger)?;
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(RatingError::OutOfRange { value, low, high })
    }
}

/// A [`Character`] prompted to answer evaluation questions.
#[derive(Debug, Clone)]
pub struct EvaluationAgent {
    character: Character,
    inner: LLMAgent,
}

impl EvaluationAgent {
    pub fn new(character: Character, generator: Arc<dyn TextGenerator>) -> Result<Self, AgentError> {
        let system = prompt!(
            EVALUATION_TEMPLATE,
            name = &character.name,
            persona = &character.persona,
            conviction = &character.conviction,
            languages = &character.languages
        )?;
        let inner = LLMAgent::new(character.name.clone(), generator).with_system(system);
        Ok(Self { character, inner })
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.inner = self.inner.with_params(params);
        self
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Extends `dialogue` with `question` from `asker` and this agent's answer.
    pub async fn ask(
        &self,
        dialogue: &Dialogue,
        asker: &str,
        question: &str,
    ) -> Result<Dialogue, AgentError> {
        let asked = dialogue.add(asker, question);
        self.respond(&asked).await
    }

    /// Asks `question` and expects an integer in `low..=high` back.
    ///
    /// `dialogue` is not extended; each rating is a one-off continuation.
    pub async fn rating(
        &self,
        dialogue: &Dialogue,
        asker: &str,
        question: &str,
        low: i64,
        high: i64,
    ) -> Result<RatingOutcome, AgentError> {
        let question = format!(
            "{question}\n\nReply with a single integer in the range {low}-{high}. Say nothing else."
        );
        let answered = self.ask(dialogue, asker, &question).await?;
        let reply = answered
            .last()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();

        match parse_rating(&reply, low, high) {
            Ok(score) => Ok(RatingOutcome::Score(score)),
            Err(reason) => {
                tracing::warn!(agent = %self.character.name, %reply, %reason, "omitting rating");
                Ok(RatingOutcome::Omitted { reply, reason })
            }
        }
    }
}

#[async_trait]
impl Agent for EvaluationAgent {
    fn name(&self) -> &str {
        &self.character.name
    }

    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError> {
        self.inner.response(dialogue).await
    }
}
