//! 'argubot' - simulated conversations with argument bots, judged by LLMs.
//!
//! An *argubot* is a conversational agent meant to broaden its partner's
//! mind: it pushes back, politely, on whatever position the other side takes.
//! This crate lets you build such agents, pit them against simulated human
//! [`Character`](character::Character)s, and score the resulting dialogues
//! with an LLM-as-judge protocol.
//!
//! The pieces:
//!
//! - [`dialogue`]: immutable multi-speaker transcripts.
//! - [`message`]: turning a dialogue into role-tagged chat messages for one speaker.
//! - [`agent`]: the [`Agent`](agent::Agent) trait and its variants, from a
//!   constant reply to corpus lookup to prompted LLMs.
//! - [`simulate`]: alternating two agents for a number of turns.
//! - [`eval`]: the [`Eval`](eval::Eval) aggregate, the judging protocol and
//!   whole evaluation campaigns.
//! - [`llm`]: the text-generation seam, with an OpenAI-compatible client
//!   behind the `openai-api` feature.
//!
//! ```rust
//! use argubot::agent::ConstantAgent;
//! use argubot::simulate::simulated_dialogue;
//!
//! # async fn example() -> Result<(), argubot::agent::AgentError> {
//! let airhead = ConstantAgent::new("Airhead", "I know right???");
//! let echo = ConstantAgent::new("Echo", "Totally.");
//! let d = simulated_dialogue(&airhead, &echo, 4).await?;
//! println!("{d}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod character;
pub mod claims;
pub mod dialogue;
pub mod eval;
pub mod llm;
pub mod message;
pub mod observability;
pub mod prompt;
pub mod simulate;

#[cfg(test)]
mod test_support;

#[doc(hidden)]
pub use minijinja as __minijinja;

pub use agent::{Agent, AgentError, BoxedAgent};
pub use character::Character;
pub use claims::{ClaimCorpus, ClaimKind, ClaimStore};
pub use dialogue::{Dialogue, Turn};
pub use eval::{Eval, EvalCampaign, EvalConfig, EvalError};
pub use llm::{GenerationParams, TextGenerator, UsageLedger, UsageTracker};
pub use message::{ChatMessage, FormatOptions, Role, format_as_messages};
pub use simulate::{Simulator, simulated_dialogue};
