//! An agent that always says the same thing.

use crate::agent::{Agent, AgentError};
use crate::dialogue::Dialogue;
use async_trait::async_trait;

/// Ignores the dialogue and always replies with a fixed string.
#[derive(Debug, Clone)]
pub struct ConstantAgent {
    name: String,
    reply: String,
}

impl ConstantAgent {
    pub fn new(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Agent for ConstantAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn response(&self, _dialogue: &Dialogue) -> Result<String, AgentError> {
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_constant_reply_ignores_input() {
        let agent = ConstantAgent::new("Airhead", "I know right???");
        let d = Dialogue::new().add("Bob", "What do you think about taxes?");

        assert_eq!(agent.response(&d).await.unwrap(), "I know right???");
        assert_eq!(agent.response(&Dialogue::new()).await.unwrap(), "I know right???");
        assert!(agent.conversation_starters().is_none());
    }

    #[tokio::test]
    async fn test_respond_appends_under_own_name() {
        let agent = ConstantAgent::new("Airhead", "I know right???");
        let d = Dialogue::new().add("Bob", "Hi");
        let extended = agent.respond(&d).await.unwrap();

        assert_eq!(d.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended[1].speaker, "Airhead");
    }
}
