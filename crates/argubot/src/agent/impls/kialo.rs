//! An argubot that answers with counterarguments from a claim corpus. No LLM is used.

use crate::agent::{Agent, AgentError};
use crate::claims::{ClaimKind, ClaimStore};
use crate::dialogue::Dialogue;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Number of nearest claims to choose a reply from.
pub(crate) const NEIGHBORS: usize = 3;

/// Replies with a counterargument to the claim closest to the previous turn.
///
/// On an empty dialogue it opens with a random top-level claim.
pub struct KialoAgent {
    name: String,
    store: Arc<dyn ClaimStore>,
    rng: Mutex<StdRng>,
}

impl KialoAgent {
    pub fn new(name: impl Into<String>, store: Arc<dyn ClaimStore>) -> Self {
        Self {
            name: name.into(),
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Makes the agent's random choices reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }
}

#[async_trait]
impl Agent for KialoAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let Some(previous) = dialogue.last() else {
            return self.store.random_seed_claim(&mut *rng).ok_or_else(|| {
                AgentError::Precondition("claim corpus has no top-level claims".to_string())
            });
        };

        let neighbors = self
            .store
            .closest(&previous.content, NEIGHBORS, ClaimKind::HasCons, None)?;
        let neighbor = choose(&mut *rng, &neighbors, || {
            "no claims to choose from; is the claim corpus empty?".to_string()
        })?;
        tracing::info!(agent = %self.name, claim = %neighbor, "chose similar claim");

        let cons = self.store.cons(neighbor);
        let reply = choose(&mut *rng, &cons, || {
            format!("claim {neighbor:?} has no counterarguments")
        })?;
        Ok(reply.clone())
    }
}

/// Picks uniformly from `items`, or fails with a precondition error.
pub(crate) fn choose<'a, R: Rng + ?Sized>(
    rng: &mut R,
    items: &'a [String],
    describe: impl FnOnce() -> String,
) -> Result<&'a String, AgentError> {
    items
        .choose(rng)
        .ok_or_else(|| AgentError::Precondition(describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimCorpus;

    fn store() -> Arc<dyn ClaimStore> {
        let mut corpus = ClaimCorpus::new();
        corpus.add_claim("Eating meat is morally wrong.");
        corpus.add_con(
            "Eating meat is morally wrong.",
            "Humans have always eaten meat.",
        );
        corpus.add_claim("Guns should be banned.");
        corpus.add_con("Guns should be banned.", "Banning guns disarms victims.");
        Arc::new(corpus)
    }

    #[tokio::test]
    async fn test_opens_with_seed_claim() {
        let agent = KialoAgent::new("Akiko", store()).with_seed(1);
        let opening = agent.response(&Dialogue::new()).await.unwrap();
        assert!(opening == "Eating meat is morally wrong." || opening == "Guns should be banned.");
    }

    #[tokio::test]
    async fn test_replies_with_a_counterargument() {
        let agent = KialoAgent::new("Akiko", store()).with_seed(1);
        let d = Dialogue::new().add("Bob", "I believe eating meat is morally wrong");

        let reply = agent.response(&d).await.unwrap();
        assert!(
            reply == "Humans have always eaten meat." || reply == "Banning guns disarms victims."
        );
    }

    #[tokio::test]
    async fn test_empty_corpus_is_a_precondition_error() {
        let agent = KialoAgent::new("Akiko", Arc::new(ClaimCorpus::new()));

        let err = agent.response(&Dialogue::new()).await.unwrap_err();
        assert!(err.is_precondition());

        let err = agent
            .response(&Dialogue::new().add("Bob", "hello"))
            .await
            .unwrap_err();
        assert!(err.is_precondition());
    }
}
