//! An LLM agent that plays a [`Character`].

use super::LLMAgent;
use crate::agent::{Agent, AgentError};
use crate::character::Character;
use crate::dialogue::Dialogue;
use crate::llm::{GenerationParams, TextGenerator};
use crate::prompt;
use async_trait::async_trait;
use std::sync::Arc;

const CHARACTER_TEMPLATE: &str = "\
Your name is {{ name }}, and you are {{ persona }}.
{%- if conviction %} {{ conviction }}{% endif %}
{%- if languages %} You speak {{ languages | join(\", \") }}.{% endif %}

You are chatting with someone you have just met. Reply in one to three sentences, \
as {{ name }} would, and stay in character. Do not mention that you are an AI.";

/// Simulates a human participant with the personality of a [`Character`].
///
/// The system prompt is rendered once, at construction.
#[derive(Debug, Clone)]
pub struct CharacterAgent {
    character: Character,
    inner: LLMAgent,
}

impl CharacterAgent {
    pub fn new(character: Character, generator: Arc<dyn TextGenerator>) -> Result<Self, AgentError> {
        let system = prompt!(
            CHARACTER_TEMPLATE,
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

    pub fn system(&self) -> Option<&str> {
        self.inner.system()
    }
}

#[async_trait]
impl Agent for CharacterAgent {
    fn name(&self) -> &str {
        &self.character.name
    }

    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError> {
        self.inner.response(dialogue).await
    }

    fn conversation_starters(&self) -> Option<&[String]> {
        Some(&self.character.conversation_starters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerator;

    fn bob() -> Character {
        Character::new("Bob", ["English", "French"], "an ardent vegetarian")
            .with_conviction("Eating animals is wrong.")
            .with_starters(["Do you think it's ok to eat meat?"])
    }

    #[test]
    fn test_system_prompt_mentions_profile() {
        let agent = CharacterAgent::new(bob(), Arc::new(ScriptedGenerator::new(["hi"]))).unwrap();
        let system = agent.system().unwrap();

        assert!(system.starts_with(
            "Your name is Bob, and you are an ardent vegetarian. Eating animals is wrong. \
             You speak English, French."
        ));
        assert!(system.contains("as Bob would"));
    }

    #[test]
    fn test_system_prompt_without_optional_fields() {
        let judge = Character::new("Judge Wise", Vec::<String>::new(), "a social scientist");
        let agent = CharacterAgent::new(judge, Arc::new(ScriptedGenerator::new(["hi"]))).unwrap();

        assert!(
            agent
                .system()
                .unwrap()
                .starts_with("Your name is Judge Wise, and you are a social scientist.\n\n")
        );
    }

    #[tokio::test]
    async fn test_exposes_starters_and_speaks_as_character() {
        let generator = Arc::new(ScriptedGenerator::new(["Meat is murder."]));
        let agent = CharacterAgent::new(bob(), generator).unwrap();

        assert_eq!(
            agent.conversation_starters().unwrap(),
            &["Do you think it's ok to eat meat?".to_string()]
        );
        let d = agent.respond(&Dialogue::new().add("Alice", "Hi")).await.unwrap();
        assert_eq!(d[1].speaker, "Bob");
        assert_eq!(d[1].content, "Meat is murder.");
    }
}
