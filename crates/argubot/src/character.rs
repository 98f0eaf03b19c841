//! Character profiles used to drive simulated human participants.

use serde::{Deserialize, Serialize};

/// A configured persona: who the character is and how they open conversations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    /// Languages the character speaks, most fluent first. May be empty.
    #[serde(default)]
    pub languages: Vec<String>,
    /// A noun phrase such as "an ardent vegetarian who ...".
    pub persona: String,
    /// A belief the character holds and defends.
    #[serde(default)]
    pub conviction: Option<String>,
    /// Prewritten opening lines someone might use to start a conversation with them.
    #[serde(default)]
    pub conversation_starters: Vec<String>,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        languages: impl IntoIterator<Item = impl Into<String>>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            languages: languages.into_iter().map(Into::into).collect(),
            persona: persona.into(),
            conviction: None,
            conversation_starters: Vec::new(),
        }
    }

    pub fn with_conviction(mut self, conviction: impl Into<String>) -> Self {
        self.conviction = Some(conviction.into());
        self
    }

    pub fn with_starters(mut self, starters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.conversation_starters = starters.into_iter().map(Into::into).collect();
        self
    }
}

/// The development panel of characters that argubots are evaluated against.
pub fn dev_set() -> Vec<Character> {
    let meat = "Do you think it's ok to eat meat?";
    vec![
        Character::new(
            "Bob",
            ["English"],
            "an ardent vegetarian who thinks everyone should be vegetarian",
        )
        .with_conviction("Eating animals is morally wrong.")
        .with_starters([meat]),
        Character::new(
            "Cara",
            ["English"],
            "a committed carnivore who hates being told what to do",
        )
        .with_conviction("What I eat is nobody else's business.")
        .with_starters([meat]),
        Character::new(
            "Darius",
            ["English"],
            "an intuitive thinker who struggles with logical arguments and trusts gut feelings",
        )
        .with_starters(["Should people be allowed to own guns?"]),
        Character::new(
            "Eve",
            ["English", "Spanish"],
            "a curious and skeptical person who wants to understand the evidence behind every claim",
        )
        .with_starters(["Is social media making us less happy?"]),
        Character::new(
            "TrollFace",
            ["English"],
            "a troll who loves to ridicule everyone and everything and never argues in good faith",
        )
        .with_starters(["Do you think climate change is a hoax?"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let c = Character::new("Judge Wise", Vec::<String>::new(), "a social scientist")
            .with_conviction("Evidence matters.");
        assert!(c.languages.is_empty());
        assert_eq!(c.conviction.as_deref(), Some("Evidence matters."));
        assert!(c.conversation_starters.is_empty());
    }

    #[test]
    fn test_dev_set_names_are_unique_and_have_starters() {
        let chars = dev_set();
        let mut names: Vec<_> = chars.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), chars.len());
        assert!(chars.iter().all(|c| !c.conversation_starters.is_empty()));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let c: Character =
            serde_json::from_str(r#"{"name": "Ann", "persona": "a pilot"}"#).unwrap();
        assert_eq!(c, Character::new("Ann", Vec::<String>::new(), "a pilot"));
    }
}
