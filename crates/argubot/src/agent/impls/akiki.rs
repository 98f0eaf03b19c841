//! A claim-corpus argubot that copes better with short user turns.

use super::kialo::{NEIGHBORS, choose};
use crate::agent::{Agent, AgentError};
use crate::claims::{ClaimKind, ClaimStore};
use crate::dialogue::Dialogue;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

/// Default minimum similarity score for the thresholded queries.
pub const DEFAULT_THRESHOLD: f64 = 8.0;

/// Like [`KialoAgent`](super::KialoAgent), but queries the corpus with the
/// whole conversation, weighting recent turns more heavily.
///
/// Lookup order:
/// 1. the other speakers' turns, claims with counterarguments, above the threshold;
/// 2. if nothing matched and the dialogue has more than one turn: this agent's
///    own turns, claims with supporting arguments, above the threshold;
/// 3. if still nothing: the other speakers' turns, claims with
///    counterarguments, no threshold.
///
/// The reply is a counterargument of a random match, or one of its
/// supporting arguments when it has none.
pub struct AkikiAgent {
    name: String,
    store: Arc<dyn ClaimStore>,
    threshold: f64,
    rng: Mutex<StdRng>,
}

impl AkikiAgent {
    pub fn new(name: impl Into<String>, store: Arc<dyn ClaimStore>) -> Self {
        Self {
            name: name.into(),
            store,
            threshold: DEFAULT_THRESHOLD,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Concatenates the contents of the selected turns, repeating the turn at
    /// position `i` `i + 1` times so later turns weigh more.
    fn weighted_query(&self, dialogue: &Dialogue, own: bool) -> String {
        dialogue
            .iter()
            .enumerate()
            .filter(|(_, turn)| (turn.speaker == self.name) == own)
            .flat_map(|(i, turn)| std::iter::repeat_n(turn.content.as_str(), i + 1))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn neighbors(&self, dialogue: &Dialogue) -> Result<Vec<String>, AgentError> {
        let others = self.weighted_query(dialogue, false);
        let threshold = Some(self.threshold);

        let mut neighbors =
            self.store
                .closest(&others, NEIGHBORS, ClaimKind::HasCons, threshold)?;
        if neighbors.is_empty() && dialogue.len() > 1 {
            let own = self.weighted_query(dialogue, true);
            tracing::debug!(agent = %self.name, "falling back to own turns");
            neighbors = self
                .store
                .closest(&own, NEIGHBORS, ClaimKind::HasPros, threshold)?;
        }
        if neighbors.is_empty() {
            tracing::debug!(agent = %self.name, "falling back to unthresholded query");
            neighbors = self
                .store
                .closest(&others, NEIGHBORS, ClaimKind::HasCons, None)?;
        }
        Ok(neighbors)
    }
}

#[async_trait]
impl Agent for AkikiAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn response(&self, dialogue: &Dialogue) -> Result<String, AgentError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        if dialogue.is_empty() {
            return self.store.random_seed_claim(&mut *rng).ok_or_else(|| {
                AgentError::Precondition("claim corpus has no top-level claims".to_string())
            });
        }

        let neighbors = self.neighbors(dialogue)?;
        let neighbor = choose(&mut *rng, &neighbors, || {
            "no claims to choose from; is the claim corpus empty?".to_string()
        })?;
        tracing::info!(agent = %self.name, claim = %neighbor, "chose similar claim");

        let mut replies = self.store.cons(neighbor);
        if replies.is_empty() {
            replies = self.store.pros(neighbor);
        }
        let reply = choose(&mut *rng, &replies, || {
            format!("claim {neighbor:?} has neither counterarguments nor supporting arguments")
        })?;
        Ok(reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::ClaimCorpus;
    use rand::RngCore;

    /// Records every query and answers from a fixed table keyed by (kind, thresholded).
    struct RecordingStore {
        queries: Mutex<Vec<(String, ClaimKind, Option<f64>)>>,
        answers: Vec<((ClaimKind, bool), Vec<String>)>,
    }

    impl RecordingStore {
        fn new(answers: Vec<((ClaimKind, bool), Vec<String>)>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                answers,
            }
        }

        fn queries(&self) -> Vec<(String, ClaimKind, Option<f64>)> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl ClaimStore for RecordingStore {
        fn closest(
            &self,
            query: &str,
            _n: usize,
            kind: ClaimKind,
            threshold: Option<f64>,
        ) -> Result<Vec<String>, AgentError> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), kind, threshold));
            Ok(self
                .answers
                .iter()
                .find(|((k, t), _)| *k == kind && *t == threshold.is_some())
                .map(|(_, hits)| hits.clone())
                .unwrap_or_default())
        }

        fn cons(&self, claim: &str) -> Vec<String> {
            if claim == "with cons" {
                vec!["a con".to_string()]
            } else {
                Vec::new()
            }
        }

        fn pros(&self, _claim: &str) -> Vec<String> {
            vec!["a pro".to_string()]
        }

        fn random_seed_claim(&self, _rng: &mut dyn RngCore) -> Option<String> {
            Some("seed".to_string())
        }
    }

    fn dialogue() -> Dialogue {
        Dialogue::new()
            .add("Akiki", "bot one")
            .add("Bob", "user one")
            .add("Akiki", "bot two")
            .add("Bob", "user two")
    }

    #[test]
    fn test_weighted_query_repeats_recent_turns() {
        let agent = AkikiAgent::new("Akiki", Arc::new(ClaimCorpus::new()));
        assert_eq!(
            agent.weighted_query(&dialogue(), false),
            "user one user one user two user two user two user two"
        );
        assert_eq!(
            agent.weighted_query(&dialogue(), true),
            "bot one bot two bot two bot two"
        );
    }

    #[tokio::test]
    async fn test_first_query_hit_stops_fallbacks() {
        let store = Arc::new(RecordingStore::new(vec![(
            (ClaimKind::HasCons, true),
            vec!["with cons".to_string()],
        )]));
        let agent = AkikiAgent::new("Akiki", store.clone()).with_seed(3);

        assert_eq!(agent.response(&dialogue()).await.unwrap(), "a con");
        assert_eq!(store.queries().len(), 1);
        assert_eq!(store.queries()[0].2, Some(DEFAULT_THRESHOLD));
    }

    #[tokio::test]
    async fn test_fallback_order_is_preserved() {
        let store = Arc::new(RecordingStore::new(vec![(
            (ClaimKind::HasCons, false),
            vec!["without cons".to_string()],
        )]));
        let agent = AkikiAgent::new("Akiki", store.clone()).with_seed(3);

        // "without cons" has no counterarguments, so a supporting argument is used.
        assert_eq!(agent.response(&dialogue()).await.unwrap(), "a pro");

        let kinds: Vec<_> = store.queries().iter().map(|q| (q.1, q.2.is_some())).collect();
        assert_eq!(
            kinds,
            vec![
                (ClaimKind::HasCons, true),
                (ClaimKind::HasPros, true),
                (ClaimKind::HasCons, false),
            ]
        );
        assert!(store.queries()[1].0.starts_with("bot one"));
    }

    #[tokio::test]
    async fn test_single_turn_skips_own_turn_fallback() {
        let store = Arc::new(RecordingStore::new(vec![(
            (ClaimKind::HasCons, false),
            vec!["with cons".to_string()],
        )]));
        let agent = AkikiAgent::new("Akiki", store.clone()).with_seed(3);

        agent
            .response(&Dialogue::new().add("Bob", "hi"))
            .await
            .unwrap();
        let kinds: Vec<_> = store.queries().iter().map(|q| q.1).collect();
        assert_eq!(kinds, vec![ClaimKind::HasCons, ClaimKind::HasCons]);
    }

    #[tokio::test]
    async fn test_no_candidates_is_a_precondition_error() {
        let store = Arc::new(RecordingStore::new(Vec::new()));
        let agent = AkikiAgent::new("Akiki", store);

        let err = agent.response(&dialogue()).await.unwrap_err();
        assert!(err.is_precondition());
        assert_eq!(agent.response(&Dialogue::new()).await.unwrap(), "seed");
    }
}
