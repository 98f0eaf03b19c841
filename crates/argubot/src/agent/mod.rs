//! Agents that take part in dialogues.
//!
//! An [`Agent`] produces the next turn of a [`Dialogue`]. Agents are
//! stateless with respect to the conversation: everything they know about it
//! arrives through the `dialogue` argument, and any configuration (name,
//! system prompt, backing data) is fixed at construction.
//!
//! The only required behaviour is [`Agent::response`], which returns the
//! content of the agent's next turn. [`Agent::respond`] builds on it and
//! returns the extended dialogue.
//!
//! # Variants
//!
//! | Agent | Behaviour |
//! |-------|-----------|
//! | [`ConstantAgent`] | always says the same thing |
//! | [`LLMAgent`] | prompted LLM, formats the dialogue as chat messages |
//! | [`CharacterAgent`] | LLM agent playing a [`Character`](crate::character::Character) |
//! | [`KialoAgent`] | answers with a counterargument from a claim corpus |
//! | [`AkikiAgent`] | corpus lookup with recency-weighted, thresholded queries |
//! | [`EvaluationAgent`] | a character answering questions about a dialogue |
//!
//! # Example
//!
//! ```rust
//! use argubot::agent::{Agent, ConstantAgent};
//! use argubot::dialogue::Dialogue;
//!
//! # async fn example() -> Result<(), argubot::agent::AgentError> {
//! let airhead = ConstantAgent::new("Airhead", "I know right???");
//! let d = airhead.respond(&Dialogue::new().add("Bob", "Meat is murder.")).await?;
//! assert_eq!(d.last().unwrap().content, "I know right???");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod evaluation;
pub mod impls;

pub use error::AgentError;
pub use evaluation::{EvaluationAgent, RatingError, RatingOutcome};
pub use impls::{AkikiAgent, CharacterAgent, ConstantAgent, KialoAgent, LLMAgent};

use crate::dialogue::Dialogue;
use async_trait::async_trait;

/// The core trait for dialogue participants.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The speaker name this agent uses in dialogues.
    fn name(&self) -> &str;

    /// Returns the content of this agent's next turn.
    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError>;

    /// Returns `dialogue` extended with this agent's next turn.
    async fn respond(&self, dialogue: &Dialogue) -> Result<Dialogue, AgentError> {
        let content = self.response(dialogue).await?;
        tracing::debug!(agent = self.name(), content = %content, "agent responded");
        Ok(dialogue.add(self.name(), content))
    }

    /// Prewritten opening lines another agent may use to start a conversation with this one.
    ///
    /// `None` means the agent has no such capability.
    fn conversation_starters(&self) -> Option<&[String]> {
        None
    }
}

/// A boxed agent trait object for dynamic dispatch.
pub type BoxedAgent = Box<dyn Agent>;
